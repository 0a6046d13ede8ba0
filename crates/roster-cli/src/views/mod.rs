//! View state for each screen. Pure data plus the transitions the key
//! handlers apply; no I/O and no rendering.

pub mod assessment;
pub mod candidate_detail;
pub mod candidates;
pub mod input;
pub mod job_detail;
pub mod jobs;
pub mod pipeline;
