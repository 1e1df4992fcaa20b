//! `Dataset`: the public entry point tying the topology builder, simplifier,
//! and reassembler together behind a single struct wrapping a geometry
//! collection plus per-feature attribute records.

use geo::Polygon;

use crate::error::{Error, Result};
use crate::ids::FeatureId;
use crate::oracle::{GeoOracle, GeometryOracle};
use crate::options::Options;
use crate::store::SegmentStore;
use crate::{reassemble, topology};

/// A collection of polygon features with shared-border topology, ready to be
/// progressively simplified. `A` is the caller-supplied attribute-record type
/// carried verbatim through to output.
pub struct Dataset<A> {
    features: Vec<A>,
    original_areas: Vec<f64>,
    store: SegmentStore,
    oracle: Box<dyn GeometryOracle>,
    options: Options,
    tolerance: f64,
    /// Spatial-reference-system token, carried verbatim from load to save.
    /// The core never inspects or reprojects it (see `SPEC_FULL.md` §6.2).
    srs: Option<serde_json::Value>,
}

impl<A> Dataset<A> {
    /// Build a dataset from feature polygons and their attribute records, one
    /// per feature, in matching order. Each polygon must be simply-connected
    /// (no holes) — see `DESIGN.md` Open Question 3.
    pub fn new(polygons: Vec<Polygon<f64>>, attributes: Vec<A>, options: Options) -> Result<Self> {
        Self::with_oracle(polygons, attributes, options, Box::new(GeoOracle::default()))
    }

    /// Build a dataset with a caller-supplied geometry oracle, for testing or
    /// for substituting an alternate geometric predicate backend.
    pub fn with_oracle(
        polygons: Vec<Polygon<f64>>,
        attributes: Vec<A>,
        options: Options,
        oracle: Box<dyn GeometryOracle>,
    ) -> Result<Self> {
        assert_eq!(polygons.len(), attributes.len(), "one attribute record is required per feature");

        let mut original_areas = Vec::with_capacity(polygons.len());
        for poly in &polygons {
            original_areas.push(oracle.area(poly).map_err(Error::GeometryOracleFailure)?);
        }
        let store = topology::build(&polygons, oracle.as_ref(), &options)?;

        Ok(Self { features: attributes, original_areas, store, oracle, options, tolerance: 0.0, srs: None })
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn srs(&self) -> Option<&serde_json::Value> {
        self.srs.as_ref()
    }

    pub fn set_srs(&mut self, srs: Option<serde_json::Value>) {
        self.srs = srs;
    }

    pub fn attributes(&self) -> &[A] {
        &self.features
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn live_segment_count(&self) -> usize {
        self.store.live_segment_count()
    }

    /// Progressively, destructively simplify the dataset's linework. Must be
    /// called with a non-decreasing tolerance across successive calls.
    pub fn simplify(&mut self, tolerance: f64) -> Result<()> {
        crate::simplify::simplify(&mut self.store, self.oracle.as_ref(), self.tolerance, tolerance)?;
        self.tolerance = tolerance;
        Ok(())
    }

    /// Reassemble every feature's polygon at the current tolerance. Features
    /// dropped as legitimately too small are absent from the result; their
    /// attribute record is still reachable via `attributes()`.
    pub fn reassemble(&self) -> Result<Vec<(FeatureId, Polygon<f64>)>> {
        reassemble::reassemble_all(&self.store, self.oracle.as_ref(), &self.original_areas, self.tolerance, &self.options)
    }

    /// Reassemble a single feature by index.
    pub fn reassemble_feature(&self, feature: FeatureId) -> Result<reassemble::Reassembled> {
        let area = self
            .original_areas
            .get(feature.0)
            .copied()
            .ok_or_else(|| Error::GeometryOracleFailure(anyhow::anyhow!("feature {feature} out of range")))?;
        reassemble::reassemble_feature(&self.store, self.oracle.as_ref(), feature, area, self.tolerance, &self.options)
    }
}
