//! Default [`GeometryOracle`] implementation.
//!
//! `geo` 0.30 has no general-purpose overlay/noding engine: `BooleanOps`
//! only operates on areal `Polygon`/`MultiPolygon` pairs, and there is no
//! `line_merge`, linear `difference`, or `polygonize` at all. This
//! implementation covers that gap with coordinate-quantized edge matching
//! plus walk-based stitching: snap every edge's endpoints to a grid, treat
//! edges as an unordered bag keyed by their (undirected) snapped endpoints,
//! and reconstruct chains or rings by walking the adjacency they form.

use std::collections::{HashMap, HashSet};

use ahash::AHashMap;
use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, BoundingRect, Coord, Line, LineString, MultiLineString, Polygon};

use super::GeometryOracle;
use crate::geom::{Geom, Seg};

/// Default absolute coordinate-matching tolerance (roughly 10cm in
/// geographic degrees); override with [`GeoOracle::with_epsilon`] for
/// differently-scaled inputs (e.g. projected meters).
pub const DEFAULT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct QCoord {
    x: i64,
    y: i64,
}

impl QCoord {
    fn new(c: Coord<f64>, eps: f64) -> Self {
        Self { x: (c.x / eps).round() as i64, y: (c.y / eps).round() as i64 }
    }

    fn to_coord(self, eps: f64) -> Coord<f64> {
        Coord { x: self.x as f64 * eps, y: self.y as f64 * eps }
    }
}

fn canonical(a: QCoord, b: QCoord) -> (QCoord, QCoord) {
    if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) }
}

/// `GeometryOracle` backed by `geo` primitives plus hand-rolled edge
/// matching/stitching for the operations `geo` doesn't provide.
#[derive(Debug, Clone, Copy)]
pub struct GeoOracle {
    eps: f64,
}

impl Default for GeoOracle {
    fn default() -> Self {
        Self { eps: DEFAULT_EPSILON }
    }
}

impl GeoOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epsilon(eps: f64) -> Self {
        Self { eps }
    }

    fn ring_edges(&self, ring: &LineString<f64>) -> Vec<(QCoord, QCoord, Coord<f64>, Coord<f64>)> {
        ring.0
            .windows(2)
            .filter(|w| w[0] != w[1])
            .map(|w| (QCoord::new(w[0], self.eps), QCoord::new(w[1], self.eps), w[0], w[1]))
            .collect()
    }

    /// Stitch a bag of undirected edges into chains. `close_rings` controls
    /// whether an unclosed walk is force-closed with a straight line back to
    /// its start (used by `polygonize`) or left open (used by `line_merge`).
    fn stitch(&self, edges: &[(QCoord, QCoord)], close_rings: bool) -> Vec<Vec<Coord<f64>>> {
        if edges.is_empty() {
            return Vec::new();
        }

        let mut adj: HashMap<QCoord, Vec<QCoord>> = HashMap::new();
        for &(a, b) in edges {
            adj.entry(a).or_default().push(b);
            adj.entry(b).or_default().push(a);
        }

        let mut used: HashSet<(QCoord, QCoord)> = HashSet::new();
        let mut chains = Vec::new();

        // Prefer starting walks at degree-1 vertices so open chains come out
        // with their true endpoints rather than split mid-chain.
        let mut starts: Vec<QCoord> = adj
            .iter()
            .filter(|(_, n)| n.len() == 1)
            .map(|(c, _)| *c)
            .collect();
        starts.sort_by_key(|c| (c.x, c.y));
        let mut all_endpoints: Vec<QCoord> = adj.keys().copied().collect();
        all_endpoints.sort_by_key(|c| (c.x, c.y));
        starts.extend(all_endpoints);

        for start in starts {
            let neighbors = match adj.get(&start) {
                Some(n) => n.clone(),
                None => continue,
            };
            for &first in &neighbors {
                let start_edge = canonical(start, first);
                if used.contains(&start_edge) {
                    continue;
                }
                used.insert(start_edge);

                let mut chain = vec![start, first];
                let mut curr = first;

                loop {
                    if curr == chain[0] && chain.len() > 2 {
                        break;
                    }
                    let Some(ns) = adj.get(&curr) else { break };
                    let next = ns.iter().find(|&&n| !used.contains(&canonical(curr, n))).copied();
                    match next {
                        Some(n) => {
                            used.insert(canonical(curr, n));
                            chain.push(n);
                            curr = n;
                        }
                        None => break,
                    }
                }

                if close_rings && chain.first() != chain.last() && chain.len() >= 3 {
                    chain.push(chain[0]);
                }

                if chain.len() >= 2 {
                    chains.push(chain.iter().map(|q| q.to_coord(self.eps)).collect());
                }
            }
        }

        chains
    }
}

impl GeometryOracle for GeoOracle {
    fn intersection(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> anyhow::Result<Geom> {
        let a_rect = a.bounding_rect();
        let b_rect = b.bounding_rect();
        let (Some(ar), Some(br)) = (a_rect, b_rect) else { return Ok(Geom::Empty) };
        if ar.max().x < br.min().x || br.max().x < ar.min().x || ar.max().y < br.min().y || br.max().y < ar.min().y {
            return Ok(Geom::Empty);
        }

        let a_edges: AHashMap<(QCoord, QCoord), (Coord<f64>, Coord<f64>)> = self
            .ring_edges(a.exterior())
            .into_iter()
            .map(|(qa, qb, ca, cb)| (canonical(qa, qb), (ca, cb)))
            .collect();

        let mut shared = Vec::new();
        for (qa, qb, ca, cb) in self.ring_edges(b.exterior()) {
            let key = canonical(qa, qb);
            if a_edges.contains_key(&key) {
                shared.push(LineString::new(vec![ca, cb]));
            }
        }

        if shared.is_empty() {
            Ok(Geom::Empty)
        } else {
            Ok(Geom::MultiLineString(MultiLineString::new(shared)))
        }
    }

    fn line_merge(&self, lines: Vec<LineString<f64>>) -> anyhow::Result<Geom> {
        let edges: Vec<(QCoord, QCoord)> = lines
            .iter()
            .flat_map(|ls| self.ring_edges(ls))
            .map(|(qa, qb, _, _)| (qa, qb))
            .collect();

        let chains = self.stitch(&edges, false);
        match chains.len() {
            0 => Ok(Geom::Empty),
            1 => Ok(Geom::LineString(LineString::new(chains.into_iter().next().unwrap()))),
            _ => Ok(Geom::MultiLineString(MultiLineString::new(
                chains.into_iter().map(LineString::new).collect(),
            ))),
        }
    }

    fn boundary(&self, poly: &Polygon<f64>) -> anyhow::Result<Geom> {
        if poly.interiors().is_empty() {
            Ok(Geom::LineString(poly.exterior().clone()))
        } else {
            let mut rings = vec![poly.exterior().clone()];
            rings.extend(poly.interiors().iter().cloned());
            Ok(Geom::MultiLineString(MultiLineString::new(rings)))
        }
    }

    fn difference(&self, minuend: &Geom, subtrahend: &Geom) -> anyhow::Result<Geom> {
        let subtract_edges: HashSet<(QCoord, QCoord)> = subtrahend
            .clone()
            .into_line_strings()
            .iter()
            .flat_map(|ls| self.ring_edges(ls))
            .map(|(qa, qb, _, _)| canonical(qa, qb))
            .collect();

        // Removing edges from a ring (or chain) can split it into several
        // disjoint open chains; treat the survivors as an unordered bag of
        // edges and re-stitch, rather than naively re-joining consecutive
        // surviving windows (which would paper over the gap left by each
        // removed edge with a phantom segment).
        let surviving_edges: Vec<(QCoord, QCoord)> = minuend
            .clone()
            .into_line_strings()
            .iter()
            .flat_map(|ls| self.ring_edges(ls))
            .map(|(qa, qb, _, _)| canonical(qa, qb))
            .filter(|e| !subtract_edges.contains(e))
            .collect();

        let chains = self.stitch(&surviving_edges, false);
        let remaining: Vec<LineString<f64>> =
            chains.into_iter().filter(|c| c.len() >= 2).map(LineString::new).collect();

        match remaining.len() {
            0 => Ok(Geom::Empty),
            1 => Ok(Geom::LineString(remaining.into_iter().next().unwrap())),
            _ => Ok(Geom::MultiLineString(MultiLineString::new(remaining))),
        }
    }

    fn crosses(&self, a: Seg, b: Seg) -> anyhow::Result<bool> {
        let la = Line::new(a.start(), a.end());
        let lb = Line::new(b.start(), b.end());
        match line_intersection(la, lb) {
            Some(LineIntersection::SinglePoint { is_proper, .. }) => Ok(is_proper),
            Some(LineIntersection::Collinear { .. }) | None => Ok(false),
        }
    }

    fn polygonize(&self, segments: &[Seg]) -> anyhow::Result<Vec<Polygon<f64>>> {
        let edges: Vec<(QCoord, QCoord)> = segments
            .iter()
            .map(|s| (QCoord::new(s.start(), self.eps), QCoord::new(s.end(), self.eps)))
            .filter(|(a, b)| a != b)
            .collect();

        let rings = self.stitch(&edges, true);
        Ok(rings
            .into_iter()
            .filter(|r| r.len() >= 4 && r.first() == r.last())
            .map(|coords| Polygon::new(LineString::new(coords), vec![]))
            .collect())
    }

    fn area(&self, poly: &Polygon<f64>) -> anyhow::Result<f64> {
        Ok(poly.unsigned_area())
    }
}
