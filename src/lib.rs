//! Topology-safe simplification of shared-border polygon datasets.
//!
//! Given a set of polygon features that tile a plane with shared borders,
//! [`Dataset::simplify`] removes interior vertices so each surviving vertex
//! sits more than a caller-supplied tolerance from the line joining its
//! neighbors, without ever letting one feature's boundary cross another's or
//! letting a shared border drift apart between the two features that share
//! it. See `SPEC_FULL.md` for the full design.

pub mod dataset;
pub mod error;
pub mod geom;
pub mod ids;
pub mod io;
pub mod oracle;
pub mod options;
pub mod reassemble;
mod simplify;
mod store;
mod topology;

pub use dataset::Dataset;
pub use error::{Error, ReassemblySmall, Result};
pub use options::Options;
