//! Error taxonomy for the simplification pipeline.
//!
//! A plain enum with a hand-written `Display` impl rather than a
//! derive-macro error crate. `anyhow` is used at the I/O and geometry-oracle
//! boundaries, where the underlying cause is something this crate doesn't
//! itself define.

use std::fmt;

use crate::ids::FeatureId;

/// Errors raised by the core pipeline (topology build, simplify, reassemble).
#[derive(Debug)]
pub enum Error {
    /// `simplify` was called with a tolerance smaller than a previous call's.
    ToleranceRegressed { previous: f64, requested: f64 },
    /// Phase A/B boundary-length accounting didn't close for a feature.
    TopologyIntegrity { feature: FeatureId, drift: f64 },
    /// Reassembly produced no polygon and the feature was too large to be a
    /// legitimate small-feature loss.
    ReassemblyLost { feature: FeatureId },
    /// The geometry oracle failed to evaluate a predicate it was asked for.
    GeometryOracleFailure(anyhow::Error),
    /// Failure at the GeoJSON load/save boundary.
    Io(anyhow::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ToleranceRegressed { previous, requested } => write!(
                f,
                "simplify called with tolerance {requested} smaller than previous tolerance {previous}"
            ),
            Error::TopologyIntegrity { feature, drift } => write!(
                f,
                "feature {feature} failed topology integrity check: boundary length drift {drift}"
            ),
            Error::ReassemblyLost { feature } => {
                write!(f, "failed to reassemble a meaningful polygon for feature {feature}")
            }
            Error::GeometryOracleFailure(cause) => write!(f, "geometry oracle failure: {cause}"),
            Error::Io(cause) => write!(f, "I/O failure: {cause}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::GeometryOracleFailure(cause) | Error::Io(cause) => cause.chain().next(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal outcome from the reassembler: a feature small enough, relative
/// to tolerance, that dropping it from the output is expected rather than an
/// error.
#[derive(Debug, Clone, Copy)]
pub struct ReassemblySmall {
    pub feature: FeatureId,
    pub lost_portion: f64,
}

impl fmt::Display for ReassemblySmall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dropped feature {} (lost_portion {:.3} < threshold)",
            self.feature, self.lost_portion
        )
    }
}
