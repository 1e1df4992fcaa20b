//! Progressive, topology-safe Visvalingam-style simplification.
//!
//! Runs a pass-based loop over each line: within one pass, every collapse
//! commits against the line state as it stood at the start of that pass, and
//! a segment that has just absorbed a neighbor (or just been absorbed) is
//! deferred (`preserved`) rather than collapsed again until the next pass.
//! This avoids cascading invalidation within a single pass while still
//! converging to a fixed point, and an R-tree crossing check guards every
//! commit against a collapse that would cross another live segment.

use ahash::AHashSet;

use crate::error::{Error, Result};
use crate::geom::Seg;
use crate::ids::{LineId, SegmentGuid};
use crate::oracle::GeometryOracle;
use crate::store::SegmentStore;

/// Twice the unsigned area of the triangle formed by three points, via the
/// shoelace determinant. `geo`'s `Triangle` area API is avoided here (see
/// `DESIGN.md`) in favor of a direct, unambiguous formula.
fn triangle_area(a: geo::Coord<f64>, b: geo::Coord<f64>, c: geo::Coord<f64>) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}

struct Candidate {
    area: f64,
    guid_a: SegmentGuid,
    guid_b: SegmentGuid,
    replacement: Seg,
}

/// Run `simplify(tolerance)` against `store` to a fixed point.
///
/// `previous_tolerance` enforces the monotonicity invariant; pass `0.0` for
/// a dataset that has never been simplified.
pub fn simplify(
    store: &mut SegmentStore,
    oracle: &dyn GeometryOracle,
    previous_tolerance: f64,
    tolerance: f64,
) -> Result<()> {
    if tolerance < previous_tolerance {
        return Err(Error::ToleranceRegressed { previous: previous_tolerance, requested: tolerance });
    }

    let min_area = tolerance * tolerance;
    let line_ids = store.live_lines_by_size_desc();
    let mut stable_lines: AHashSet<LineId> = AHashSet::new();

    loop {
        let mut preserved: AHashSet<SegmentGuid> = AHashSet::new();
        let mut popped = false;

        for &line_id in &line_ids {
            if stable_lines.contains(&line_id) {
                continue;
            }

            let guids = store.live_segments_of_line(line_id);
            if guids.len() < 2 {
                stable_lines.insert(line_id);
                continue;
            }

            let mut candidates: Vec<Candidate> = guids
                .windows(2)
                .map(|pair| {
                    let seg_a = store.segment(pair[0]);
                    let seg_b = store.segment(pair[1]);
                    let area = triangle_area(seg_a.start(), seg_a.end(), seg_b.end());
                    Candidate {
                        area,
                        guid_a: pair[0],
                        guid_b: pair[1],
                        replacement: Seg::new(seg_a.start(), seg_b.end()),
                    }
                })
                .collect();

            if candidates.is_empty() || candidates.iter().map(|c| c.area).fold(f64::INFINITY, f64::min) > min_area {
                stable_lines.insert(line_id);
                continue;
            }

            candidates.sort_by(|a, b| a.area.partial_cmp(&b.area).expect("segment coordinates must be finite"));

            for candidate in candidates {
                if candidate.area > min_area {
                    break;
                }
                if preserved.contains(&candidate.guid_a) || preserved.contains(&candidate.guid_b) {
                    continue;
                }

                if collapse_would_cross(store, oracle, candidate.guid_a, candidate.guid_b, candidate.replacement)? {
                    continue;
                }

                store.mark_removed(candidate.guid_b);
                store.update_endpoints(candidate.guid_a, candidate.replacement);
                preserved.insert(candidate.guid_a);
                preserved.insert(candidate.guid_b);
                popped = true;
            }
        }

        store.rebuild_index();

        if !popped {
            break;
        }
    }

    Ok(())
}

fn collapse_would_cross(
    store: &SegmentStore,
    oracle: &dyn GeometryOracle,
    guid_a: SegmentGuid,
    guid_b: SegmentGuid,
    replacement: Seg,
) -> Result<bool> {
    for candidate_guid in store.query_bbox(replacement.bbox()) {
        if candidate_guid == guid_a || candidate_guid == guid_b {
            continue;
        }
        if store.is_removed(candidate_guid) {
            continue;
        }
        let other = store.segment(candidate_guid);
        if oracle.crosses(replacement, other).map_err(Error::GeometryOracleFailure)? {
            return Ok(true);
        }
    }
    Ok(false)
}
