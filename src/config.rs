use clap::Args;

pub const DEFAULT_SESSION_GAP_MS: u64 = 500;

#[derive(Args, Debug, Clone)]
pub struct AnalysisConfig {
    /// Idle time (ms) between key-downs that ends a typing session.
    #[arg(long, default_value_t = DEFAULT_SESSION_GAP_MS)]
    pub session_gap_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            session_gap_ms: DEFAULT_SESSION_GAP_MS,
        }
    }
}
