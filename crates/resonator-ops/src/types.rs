/// Non-fatal diagnostics from a recompute.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Parts that were skipped, with the reason.
    pub warnings: Vec<String>,
    /// Time spent in kernel calls, in milliseconds.
    pub kernel_time_ms: f64,
}

/// Errors that abort a recompute entirely.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssemblyError {
    #[error("invalid parameter: {reason}")]
    InvalidParameters { reason: String },
}
