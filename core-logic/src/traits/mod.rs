use anyhow::Result;
use async_trait::async_trait;

/// Outcome of a single action attempt.
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub success: bool,
    pub message: String,
    pub tx_hash: Option<String>,
}

impl TaskResult {
    pub fn success(message: impl Into<String>, tx_hash: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            tx_hash: Some(tx_hash.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            tx_hash: None,
        }
    }
}

#[async_trait]
pub trait Task<Ctx>: Send + Sync {
    /// Returns the name of the task
    fn name(&self) -> &str;

    /// Executes the task
    async fn run(&self, ctx: Ctx) -> Result<TaskResult>;
}

/// Best-effort side channel for progress messages.
///
/// Implementations must swallow their own transport errors; the return value
/// only reports whether the message left the process.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> bool;
}

/// Notifier used when no chat credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, _message: &str) -> bool {
        false
    }
}
