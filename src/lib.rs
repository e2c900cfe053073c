/// awfms_core: household flood risk monitor for a single river gauge.
///
/// # Module structure
///
/// ```text
/// awfms_core
/// ├── model       — shared data types (RiverLevelReading, RiskLevel, MonitorError, …)
/// ├── config      — threshold, simulator and timing configuration (monitor.toml)
/// ├── logging     — levelled, component-tagged console/file logging
/// ├── simulator   — seeded random-walk water level source
/// ├── monitor     — current reading, refresh lifecycle and derived risk
/// ├── floodgate   — confirm-then-actuate floodgate state machine
/// ├── refresh     — pull-to-refresh gesture tracking
/// ├── sensor      — home sensor metadata and health
/// ├── session     — one user session: screens, clock, event wiring
/// ├── snapshot    — serializable dashboard view model
/// ├── alert
/// │   ├── thresholds — risk classification, alarm bands, gauge geometry
/// │   └── feed       — alert history and threshold-crossing alerts
/// └── analysis
///     └── trend   — 24-hour level history for the chart
/// ```

/// Public modules
pub mod alert;
pub mod analysis;
pub mod config;
pub mod floodgate;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod refresh;
pub mod sensor;
pub mod session;
pub mod simulator;
pub mod snapshot;
