use thiserror::Error;

/// Failures raised before any geometry of a layout pass is produced.
///
/// Degenerate inputs (every count zero, budgets consumed by margins) are not
/// errors; they fall back to minimum-height boxes and are flagged on the
/// allocation instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
