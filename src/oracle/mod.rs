//! The geometry oracle: the set of 2D geometric predicates the core pipeline
//! treats as an external collaborator, isolated behind a narrow trait so the
//! geometry engine backing them can be swapped out (see `geo_oracle` for the
//! concrete implementation this crate ships).

mod geo_oracle;

pub use geo_oracle::GeoOracle;

use geo::Polygon;

use crate::geom::{Geom, Seg};

/// External geometric predicates the simplification pipeline needs but does
/// not implement as its own core logic.
pub trait GeometryOracle {
    /// The intersection of two polygons, of whatever dimension results.
    fn intersection(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> anyhow::Result<Geom>;

    /// Glue a bag of line strings sharing endpoints into maximal chains.
    fn line_merge(&self, lines: Vec<geo::LineString<f64>>) -> anyhow::Result<Geom>;

    /// The full boundary of a polygon as a 1-D geometry.
    fn boundary(&self, poly: &Polygon<f64>) -> anyhow::Result<Geom>;

    /// `minuend` with every coincident edge found in `subtrahend` removed.
    fn difference(&self, minuend: &Geom, subtrahend: &Geom) -> anyhow::Result<Geom>;

    /// True iff the open interiors of the two segments properly cross
    /// (shared endpoints alone do not count).
    fn crosses(&self, a: Seg, b: Seg) -> anyhow::Result<bool>;

    /// Reconstruct polygons from an unordered bag of boundary segments.
    fn polygonize(&self, segments: &[Seg]) -> anyhow::Result<Vec<Polygon<f64>>>;

    /// Unsigned area of a polygon.
    fn area(&self, poly: &Polygon<f64>) -> anyhow::Result<f64>;
}
