//! Tunable parameters for the simplification pipeline, collected into an
//! explicit, documented configuration surface rather than hidden constants.

/// Configuration for a [`crate::Dataset`], passed as an explicit constructor
/// parameter rather than hidden module-level constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Relative bbox padding applied to each feature's bounding box before
    /// the Phase A shared-border prefilter, as a fraction of that bbox's
    /// width/height. Guards against floating-point kiss-touches being missed.
    pub bbox_inflation: f64,
    /// Maximum acceptable boundary-length drift in the topology builder's
    /// post-construction integrity check, in the input's linear units.
    pub topology_integrity_epsilon: f64,
    /// The `lost_portion` threshold below which a feature that failed to
    /// reassemble is dropped with a warning instead of raising
    /// [`crate::Error::ReassemblyLost`].
    pub small_feature_ratio: f64,
    /// Feature count below which the topology builder uses an O(n^2)
    /// all-pairs loop for the shared-border prefilter instead of building a
    /// feature-bbox R-tree.
    pub pairwise_fallback_threshold: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bbox_inflation: 0.001,
            topology_integrity_epsilon: 1e-6,
            small_feature_ratio: 4.0,
            pairwise_fallback_threshold: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let opts = Options::default();
        assert_eq!(opts.bbox_inflation, 0.001);
        assert_eq!(opts.small_feature_ratio, 4.0);
    }
}
