//! Ambient I/O collaborator: GeoJSON load/save. Everything else (shapefile,
//! other formats, CRS handling beyond pass-through) is a caller's concern —
//! see `SPEC_FULL.md` §6.2.

pub mod geojson;

pub use geojson::JsonAttrs;
