//! Topology builder: decomposes a set of feature polygons into shared and
//! unshared lines and populates a [`SegmentStore`].
//!
//! Runs in two phases: Phase A finds the borders shared between pairs of
//! features and records each one as a single line shared by both; Phase B
//! takes what's left of each feature's own boundary after subtracting its
//! shared borders and records that remainder as the feature's unshared
//! lines. An R-tree over inflated feature bounding boxes prefilters
//! candidate pairs for Phase A once the feature count is large enough to
//! make the bbox test worth the index-build cost.

use geo::{BoundingRect, Polygon};
use rstar::{RTree, RTreeObject, AABB};

use crate::error::{Error, Result};
use crate::geom::Seg;
use crate::ids::{FeatureId, LineId};
use crate::oracle::GeometryOracle;
use crate::options::Options;
use crate::store::SegmentStore;

#[derive(Debug, Clone)]
struct FeatureBox {
    idx: usize,
    bbox: AABB<[f64; 2]>,
}

impl RTreeObject for FeatureBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox
    }
}

fn inflated_bbox(poly: &Polygon<f64>, inflation: f64) -> Option<AABB<[f64; 2]>> {
    let rect = poly.bounding_rect()?;
    let xbuf = (rect.max().x - rect.min().x) * inflation;
    let ybuf = (rect.max().y - rect.min().y) * inflation;
    Some(AABB::from_corners(
        [rect.min().x - xbuf, rect.min().y - ybuf],
        [rect.max().x + xbuf, rect.max().y + ybuf],
    ))
}

/// Candidate feature-index pairs that might share a border, using an R-tree
/// prefilter above `threshold` features and a plain O(n^2) loop below it
/// (see `DESIGN.md` Open Question 2).
fn candidate_pairs(polys: &[Polygon<f64>], inflation: f64, threshold: usize) -> Vec<(usize, usize)> {
    let n = polys.len();
    if n < threshold {
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        return pairs;
    }

    let boxes: Vec<FeatureBox> = polys
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| inflated_bbox(p, inflation).map(|bbox| FeatureBox { idx, bbox }))
        .collect();
    let tree = RTree::bulk_load(boxes);

    let mut pairs = Vec::new();
    for i in 0..n {
        let Some(bbox) = inflated_bbox(&polys[i], inflation) else { continue };
        for cand in tree.locate_in_envelope_intersecting(&bbox) {
            if cand.idx > i {
                pairs.push((i, cand.idx));
            }
        }
    }
    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

fn boundary_length(ls: &geo::LineString<f64>) -> f64 {
    ls.0.windows(2).map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt()).sum()
}

fn geom_length(geom: &crate::geom::Geom) -> f64 {
    match geom {
        crate::geom::Geom::LineString(ls) => boundary_length(ls),
        crate::geom::Geom::MultiLineString(mls) => mls.0.iter().map(boundary_length).sum(),
        _ => 0.0,
    }
}

/// Build the segment store for a set of feature polygons, following the two
/// phases described in `SPEC_FULL.md` §4.2.
pub fn build(
    polys: &[Polygon<f64>],
    oracle: &dyn GeometryOracle,
    options: &Options,
) -> Result<SegmentStore> {
    let mut store = SegmentStore::new();
    let mut next_line_id = 0usize;
    let mut fresh_line = || {
        let id = LineId(next_line_id);
        next_line_id += 1;
        id
    };

    // Phase A: shared borders.
    let mut shared_per_feature: Vec<Vec<geo::LineString<f64>>> = vec![Vec::new(); polys.len()];

    for (i, j) in candidate_pairs(polys, options.bbox_inflation, options.pairwise_fallback_threshold) {
        let intersection = oracle
            .intersection(&polys[i], &polys[j])
            .map_err(Error::GeometryOracleFailure)?;
        if intersection.is_empty() {
            continue;
        }
        let merged = oracle
            .line_merge(intersection.into_line_strings())
            .map_err(Error::GeometryOracleFailure)?;
        let chains = merged.into_line_strings();
        if chains.is_empty() {
            continue;
        }

        for chain in &chains {
            let line_id = fresh_line();
            for w in chain.0.windows(2) {
                if w[0] == w[1] {
                    continue;
                }
                store.insert(FeatureId(i), Some(FeatureId(j)), line_id, Seg::new(w[0], w[1]));
            }
        }

        for chain in chains {
            shared_per_feature[i].push(chain.clone());
            shared_per_feature[j].push(chain);
        }
    }

    // Phase B: unshared remainder.
    for (i, poly) in polys.iter().enumerate() {
        let boundary = oracle.boundary(poly).map_err(Error::GeometryOracleFailure)?;
        let original_length = geom_length(&boundary);

        let mut remaining = boundary;
        for shared in &shared_per_feature[i] {
            let subtrahend = crate::geom::Geom::LineString(shared.clone());
            remaining = oracle
                .difference(&remaining, &subtrahend)
                .map_err(Error::GeometryOracleFailure)?;
        }

        let unshared_length = geom_length(&remaining);
        let shared_length: f64 = shared_per_feature[i].iter().map(boundary_length).sum();
        let drift = (original_length - shared_length - unshared_length).abs();
        if drift >= options.topology_integrity_epsilon {
            return Err(Error::TopologyIntegrity { feature: FeatureId(i), drift });
        }

        for chain in remaining.into_line_strings() {
            if chain.0.len() < 2 {
                continue;
            }
            let line_id = fresh_line();
            for w in chain.0.windows(2) {
                if w[0] == w[1] {
                    continue;
                }
                store.insert(FeatureId(i), None, line_id, Seg::new(w[0], w[1]));
            }
        }
    }

    Ok(store)
}
