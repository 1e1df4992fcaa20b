//! Segment store: an indexed table of every segment in the dataset, paired
//! with a dynamic R-tree over live segment bounding boxes, kept in sync as
//! segments are collapsed or rewritten.

use ahash::AHashMap;
use rstar::{RTree, RTreeObject, AABB};

use crate::geom::Seg;
use crate::ids::{FeatureId, LineId, SegmentGuid};

#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedSegment {
    guid: SegmentGuid,
    bbox: (f64, f64, f64, f64),
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.bbox.0, self.bbox.1], [self.bbox.2, self.bbox.3])
    }
}

#[derive(Debug, Clone)]
struct Row {
    src1: FeatureId,
    src2: Option<FeatureId>,
    line_id: LineId,
    seg: Seg,
    removed: bool,
}

/// The segment table plus its paired spatial index.
///
/// The "table" here is an in-memory discipline (parallel `Vec`/hash
/// indexes), not a literal database — see `SPEC_FULL.md` §4.1.
#[derive(Debug, Clone, Default)]
pub struct SegmentStore {
    rows: Vec<Row>,
    by_line: AHashMap<LineId, Vec<SegmentGuid>>,
    by_feature: AHashMap<FeatureId, Vec<SegmentGuid>>,
    rtree: RTree<IndexedSegment>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new segment, returning its freshly assigned guid.
    pub fn insert(&mut self, src1: FeatureId, src2: Option<FeatureId>, line_id: LineId, seg: Seg) -> SegmentGuid {
        let guid = SegmentGuid(self.rows.len());
        self.rows.push(Row { src1, src2, line_id, seg, removed: false });
        self.by_line.entry(line_id).or_default().push(guid);
        self.by_feature.entry(src1).or_default().push(guid);
        if let Some(src2) = src2 {
            self.by_feature.entry(src2).or_default().push(guid);
        }
        self.rtree.insert(IndexedSegment { guid, bbox: seg.bbox() });
        guid
    }

    pub fn update_endpoints(&mut self, guid: SegmentGuid, seg: Seg) {
        let old_bbox = self.rows[guid.0].seg.bbox();
        self.rows[guid.0].seg = seg;
        let removed = self.rtree.remove(&IndexedSegment { guid, bbox: old_bbox });
        debug_assert!(removed.is_some(), "updated segment was not present in the R-tree");
        self.rtree.insert(IndexedSegment { guid, bbox: seg.bbox() });
    }

    pub fn mark_removed(&mut self, guid: SegmentGuid) {
        let bbox = self.rows[guid.0].seg.bbox();
        self.rows[guid.0].removed = true;
        self.rtree.remove(&IndexedSegment { guid, bbox });
    }

    pub fn segment(&self, guid: SegmentGuid) -> Seg {
        self.rows[guid.0].seg
    }

    pub fn is_removed(&self, guid: SegmentGuid) -> bool {
        self.rows[guid.0].removed
    }

    /// Live segments of a line, ordered by ascending guid (chain order).
    pub fn live_segments_of_line(&self, line_id: LineId) -> Vec<SegmentGuid> {
        let mut guids: Vec<SegmentGuid> = self
            .by_line
            .get(&line_id)
            .into_iter()
            .flatten()
            .copied()
            .filter(|g| !self.rows[g.0].removed)
            .collect();
        guids.sort();
        guids
    }

    /// All live `line_id`s, ordered by descending live-segment count (the
    /// reference simplifier's pass order: larger lines first).
    pub fn live_lines_by_size_desc(&self) -> Vec<LineId> {
        let mut counts: AHashMap<LineId, usize> = AHashMap::new();
        for row in &self.rows {
            if !row.removed {
                *counts.entry(row.line_id).or_insert(0) += 1;
            }
        }
        let mut lines: Vec<(LineId, usize)> = counts.into_iter().collect();
        lines.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        lines.into_iter().map(|(id, _)| id).collect()
    }

    /// Live segments belonging to a feature (as `src1` or `src2`), in
    /// insertion order (not reassembled into a chain — the oracle's
    /// `polygonize` handles ordering).
    pub fn live_segments_of_feature(&self, feature: FeatureId) -> Vec<Seg> {
        self.by_feature
            .get(&feature)
            .into_iter()
            .flatten()
            .filter(|g| !self.rows[g.0].removed)
            .map(|g| self.rows[g.0].seg)
            .collect()
    }

    pub fn live_segment_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.removed).count()
    }

    /// Guids of live segments whose bbox intersects the given envelope,
    /// expressed as `(xmin, ymin, xmax, ymax)`.
    pub fn query_bbox(&self, bbox: (f64, f64, f64, f64)) -> Vec<SegmentGuid> {
        let envelope = AABB::from_corners([bbox.0, bbox.1], [bbox.2, bbox.3]);
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|indexed| indexed.guid)
            .collect()
    }

    /// Rebuild the R-tree from scratch against the currently live segments.
    /// Used by the simplifier at the end of each pass; rebuilds keyed on
    /// each segment's own true guid (see `DESIGN.md` Open Question 1).
    pub fn rebuild_index(&mut self) {
        let entries: Vec<IndexedSegment> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.removed)
            .map(|(i, row)| IndexedSegment { guid: SegmentGuid(i), bbox: row.seg.bbox() })
            .collect();
        self.rtree = RTree::bulk_load(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Seg {
        Seg { x1, y1, x2, y2 }
    }

    #[test]
    fn insert_then_query_finds_segment_by_bbox() {
        let mut store = SegmentStore::new();
        let guid = store.insert(FeatureId(0), None, LineId(0), seg(0.0, 0.0, 1.0, 0.0));
        let hits = store.query_bbox((-1.0, -1.0, 2.0, 2.0));
        assert_eq!(hits, vec![guid]);
    }

    #[test]
    fn mark_removed_excludes_from_line_and_index() {
        let mut store = SegmentStore::new();
        let guid = store.insert(FeatureId(0), None, LineId(0), seg(0.0, 0.0, 1.0, 0.0));
        store.mark_removed(guid);
        assert!(store.live_segments_of_line(LineId(0)).is_empty());
        assert!(store.query_bbox((-1.0, -1.0, 2.0, 2.0)).is_empty());
    }

    #[test]
    fn live_segments_of_feature_includes_shared_border_on_both_sides() {
        let mut store = SegmentStore::new();
        store.insert(FeatureId(0), Some(FeatureId(1)), LineId(0), seg(0.0, 0.0, 1.0, 0.0));
        assert_eq!(store.live_segments_of_feature(FeatureId(0)).len(), 1);
        assert_eq!(store.live_segments_of_feature(FeatureId(1)).len(), 1);
    }

    #[test]
    fn update_endpoints_moves_bbox_in_index() {
        let mut store = SegmentStore::new();
        let guid = store.insert(FeatureId(0), None, LineId(0), seg(0.0, 0.0, 1.0, 0.0));
        store.update_endpoints(guid, seg(5.0, 5.0, 6.0, 5.0));
        assert!(store.query_bbox((-1.0, -1.0, 2.0, 2.0)).is_empty());
        assert_eq!(store.query_bbox((4.0, 4.0, 7.0, 6.0)), vec![guid]);
    }

    #[test]
    fn live_lines_by_size_desc_orders_larger_lines_first() {
        let mut store = SegmentStore::new();
        store.insert(FeatureId(0), None, LineId(0), seg(0.0, 0.0, 1.0, 0.0));
        store.insert(FeatureId(0), None, LineId(1), seg(1.0, 0.0, 2.0, 0.0));
        store.insert(FeatureId(0), None, LineId(1), seg(2.0, 0.0, 3.0, 0.0));
        assert_eq!(store.live_lines_by_size_desc(), vec![LineId(1), LineId(0)]);
    }
}
