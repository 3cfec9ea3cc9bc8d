/// Data layer: movie table, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  data/movie_metadata.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV, fill defaults → MovieTable (loaded once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / genre / actor / title predicates → MovieView
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌───────────┐  ┌─────────┐   ┌─────────┐
///   │ aggregate  │  │  chart   │   │ export  │
///   └───────────┘  └─────────┘   └─────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
