//! Core types and trait definitions for the Roster hiring board.
//!
//! No HTTP or database dependencies; every other crate builds on it.

pub mod assessment;
pub mod candidate;
pub mod error;
pub mod job;
pub mod ordering;
pub mod page;
pub mod seed;
pub mod store;
pub mod validation;

pub use error::Error;
