//! Domain failures a store reports and callers can act on.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("job not found: {0}")]
  JobNotFound(Uuid),

  /// A reorder named a `from` position the job no longer holds.
  #[error("job {id} is at order {actual}, not {expected}")]
  OrderMismatch {
    id:       Uuid,
    expected: i64,
    actual:   i64,
  },
}
