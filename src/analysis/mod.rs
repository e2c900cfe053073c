/// Presentation-side analysis for the flood monitoring dashboard.
///
/// Submodules:
/// - `trend` — 24-hour water level history and its summary statistics.

pub mod trend;
