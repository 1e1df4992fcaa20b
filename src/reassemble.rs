//! Reassembler: reconstructs each feature's polygon from its live segments.
//!
//! A feature's boundary segments should polygonize into exactly one ring; a
//! feature that comes back empty is either a legitimate casualty of
//! simplification (its whole boundary collapsed to nothing, below
//! `lost_portion = lost_area / tolerance**2 < small_feature_ratio`) or a real
//! failure worth surfacing.

use geo::Polygon;

use crate::error::{Error, ReassemblySmall, Result};
use crate::ids::FeatureId;
use crate::oracle::GeometryOracle;
use crate::options::Options;
use crate::store::SegmentStore;

pub enum Reassembled {
    Polygon(Polygon<f64>),
    Dropped(ReassemblySmall),
}

/// Reassemble one feature. `original_area` is the feature's area before any
/// simplification (used for the `lost_portion` small-feature check).
pub fn reassemble_feature(
    store: &SegmentStore,
    oracle: &dyn GeometryOracle,
    feature: FeatureId,
    original_area: f64,
    tolerance: f64,
    options: &Options,
) -> Result<Reassembled> {
    let segments = store.live_segments_of_feature(feature);
    let mut polygons = oracle.polygonize(&segments).map_err(Error::GeometryOracleFailure)?;

    if polygons.len() > 1 {
        return Err(Error::GeometryOracleFailure(anyhow::anyhow!(
            "feature {feature} polygonized into {} disjoint rings instead of one; only simply-connected features are supported",
            polygons.len()
        )));
    }

    match polygons.pop() {
        Some(poly) => Ok(Reassembled::Polygon(poly)),
        None => {
            let tolerance = tolerance.max(f64::EPSILON);
            let lost_portion = original_area / (tolerance * tolerance);
            if lost_portion < options.small_feature_ratio {
                Ok(Reassembled::Dropped(ReassemblySmall { feature, lost_portion }))
            } else {
                Err(Error::ReassemblyLost { feature })
            }
        }
    }
}

/// Reassemble every feature, dropping legitimately-small ones (diagnostics go
/// directly to stderr rather than through a logging facade).
pub fn reassemble_all(
    store: &SegmentStore,
    oracle: &dyn GeometryOracle,
    original_areas: &[f64],
    tolerance: f64,
    options: &Options,
) -> Result<Vec<(FeatureId, Polygon<f64>)>> {
    let mut out = Vec::new();
    for (i, &area) in original_areas.iter().enumerate() {
        let feature = FeatureId(i);
        match reassemble_feature(store, oracle, feature, area, tolerance, options)? {
            Reassembled::Polygon(poly) => out.push((feature, poly)),
            Reassembled::Dropped(dropped) => eprintln!("{dropped}"),
        }
    }
    Ok(out)
}
