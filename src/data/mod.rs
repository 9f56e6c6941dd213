/// Data layer: core types, loading, and feature selection.
///
/// Architecture:
/// ```text
///   Bp1851Sora.csv / Bp1851DMSO.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MeasurementTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ MeasurementTable │  time index, species, FeatureMatrix
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  optional species subset, in a fixed order
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod select;
