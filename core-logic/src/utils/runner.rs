use crate::traits::{Notifier, TaskResult};
use anyhow::Result;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};

/// Per-account tally produced by [`SequentialRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReport {
    pub account: String,
    pub attempted: u32,
    pub succeeded: u32,
}

/// Drives one action per iteration for each account, strictly in order.
///
/// Nothing runs concurrently: accounts are visited one after another and
/// every iteration is awaited before the next begins. A pause of `delay`
/// follows an iteration only if it succeeded and was not the last one.
pub struct SequentialRunner {
    iterations: u32,
    delay: Duration,
}

impl SequentialRunner {
    pub fn new(iterations: u32, delay: Duration) -> Self {
        Self { iterations, delay }
    }

    /// True when a pause belongs after `iteration` (zero-based).
    pub fn should_pause(&self, succeeded: bool, iteration: u32) -> bool {
        succeeded && iteration + 1 < self.iterations
    }

    pub async fn run<A, F, Fut>(
        &self,
        accounts: &[A],
        notifier: &dyn Notifier,
        mut action: F,
    ) -> Vec<AccountReport>
    where
        A: Clone + fmt::Display,
        F: FnMut(A, u32) -> Fut,
        Fut: Future<Output = Result<TaskResult>>,
    {
        let mut reports = Vec::with_capacity(accounts.len());

        for (idx, account) in accounts.iter().enumerate() {
            let span = info_span!("wallet", id = format!("{:03}", idx + 1));
            let report = self
                .run_account(account, notifier, &mut action)
                .instrument(span)
                .await;
            reports.push(report);
        }

        reports
    }

    async fn run_account<A, F, Fut>(
        &self,
        account: &A,
        notifier: &dyn Notifier,
        action: &mut F,
    ) -> AccountReport
    where
        A: Clone + fmt::Display,
        F: FnMut(A, u32) -> Fut,
        Fut: Future<Output = Result<TaskResult>>,
    {
        info!("=== Processing Wallet: {} ===", account);
        let mut succeeded = 0;

        for i in 0..self.iterations {
            info!(
                "=== Transaction #{} / {} for Wallet {} ===",
                i + 1,
                self.iterations,
                account
            );

            let ok = match action(account.clone(), i).await {
                Ok(result) => result.success,
                Err(e) => {
                    error!("Transaction #{} failed for wallet {}: {:#}", i + 1, account, e);
                    notifier
                        .notify(&format!(
                            "❌ Transaction #{} failed for wallet {}: {}",
                            i + 1,
                            account,
                            e
                        ))
                        .await;
                    false
                }
            };

            if ok {
                succeeded += 1;
            }

            if self.should_pause(ok, i) {
                info!(
                    "Waiting {} seconds before next transaction...",
                    self.delay.as_secs()
                );
                sleep(self.delay).await;
            }
        }

        info!(
            "Wallet {} completed {} of {} transactions.",
            account, succeeded, self.iterations
        );

        AccountReport {
            account: account.to_string(),
            attempted: self.iterations,
            succeeded,
        }
    }
}
