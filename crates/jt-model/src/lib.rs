//! Domain types shared by the launcher crates.
//!
//! Everything here is a read-only view of state owned by the remote platform:
//! task snapshots, log pages, resolved resource identifiers.
mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;
