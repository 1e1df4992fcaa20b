//! A small tagged union over the geometry shapes the geometry oracle can
//! hand back, since predicate results (intersection, difference, line-merge)
//! may degrade in dimension (areal inputs can yield a point, a line, or
//! nothing at all).

use geo::{Coord, LineString, MultiLineString, Point, Polygon};

/// The result of a geometry-oracle operation, of unknown dimension until
/// matched on. Core code pattern-matches this explicitly rather than
/// duck-typing on a `coords`-like attribute.
#[derive(Debug, Clone)]
pub enum Geom {
    Empty,
    Point(Point<f64>),
    LineString(LineString<f64>),
    MultiLineString(MultiLineString<f64>),
    Polygon(Polygon<f64>),
}

impl Geom {
    /// The 1-D line chains contained in this geometry, ignoring anything of
    /// a different dimension. Used by Phase A of the topology builder, which
    /// only cares about linear intersections between two polygons.
    pub fn into_line_strings(self) -> Vec<LineString<f64>> {
        match self {
            Geom::LineString(ls) => vec![ls],
            Geom::MultiLineString(mls) => mls.0,
            Geom::Empty | Geom::Point(_) | Geom::Polygon(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geom::Empty => true,
            Geom::Point(_) => false,
            Geom::LineString(ls) => ls.0.is_empty(),
            Geom::MultiLineString(mls) => mls.0.iter().all(|ls| ls.0.is_empty()),
            Geom::Polygon(p) => p.exterior().0.is_empty(),
        }
    }
}

/// A line segment with two endpoints, the unit collapse/crossing checks in
/// the simplifier operate on. Kept distinct from `geo::Line` so the oracle
/// boundary doesn't leak `geo`-specific types into the simplifier's core
/// loop signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seg {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Seg {
    pub fn new(a: Coord<f64>, b: Coord<f64>) -> Self {
        Self { x1: a.x, y1: a.y, x2: b.x, y2: b.y }
    }

    pub fn start(&self) -> Coord<f64> {
        Coord { x: self.x1, y: self.y1 }
    }

    pub fn end(&self) -> Coord<f64> {
        Coord { x: self.x2, y: self.y2 }
    }

    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (self.x1.min(self.x2), self.y1.min(self.y2), self.x1.max(self.x2), self.y1.max(self.y2))
    }

    pub fn to_geo_line(self) -> geo::Line<f64> {
        geo::Line::new(self.start(), self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seg_bbox_normalizes_min_max() {
        let s = Seg { x1: 3.0, y1: -1.0, x2: 1.0, y2: 2.0 };
        assert_eq!(s.bbox(), (1.0, -1.0, 3.0, 2.0));
    }

    #[test]
    fn into_line_strings_drops_non_linear_variants() {
        assert!(Geom::Polygon(Polygon::new(LineString::new(vec![]), vec![])).into_line_strings().is_empty());
    }
}
