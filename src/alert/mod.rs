/// Flood alerting: threshold classification and the user-facing alert feed.
///
/// Submodules:
/// - `thresholds` — threshold profile, risk classification, gauge mapping.
/// - `feed`       — in-memory alert list with unread tracking.

pub mod feed;
pub mod thresholds;
