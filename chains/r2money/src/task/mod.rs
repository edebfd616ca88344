use crate::account::Account;
use crate::config::R2Config;
use crate::contracts::SignerClient;
use crate::prompt::{ActionKind, ActionRequest, SwapDirection};
use crate::token::{Erc20Ledger, TokenBook, TokenDescriptor, TokenLedger};
use crate::utils::amount::{format_amount, percent_of};
use anyhow::Result;
use core_logic::Notifier;
use ethers::prelude::*;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

pub mod t01_swap;
pub mod t02_add_liquidity;
pub mod t03_remove_liquidity;

pub use self::t01_swap::SwapTask;
pub use self::t02_add_liquidity::AddLiquidityTask;
pub use self::t03_remove_liquidity::RemoveLiquidityTask;

pub use core_logic::traits::{Task, TaskResult};

/// Pre-submission reasons an action stops without sending a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No {symbol} balance available")]
    EmptyBalance { symbol: String },

    #[error("Calculated {symbol} amount is zero at {percentage}%")]
    ZeroAmount { symbol: String, percentage: u32 },

    #[error("Approval of {symbol} failed: {reason}")]
    ApprovalFailed { symbol: String, reason: String },
}

/// Read-only state shared by every account for the whole run.
#[derive(Clone)]
pub struct BotContext {
    pub config: Arc<R2Config>,
    pub book: Arc<TokenBook>,
    pub notifier: Arc<dyn Notifier>,
}

impl BotContext {
    pub fn new(config: R2Config, notifier: Arc<dyn Notifier>) -> Self {
        let book = TokenBook::from_config(&config);
        Self {
            config: Arc::new(config),
            book: Arc::new(book),
            notifier,
        }
    }

    pub fn ledger_for(&self, account: &Account) -> Arc<dyn TokenLedger> {
        Arc::new(Erc20Ledger::new(
            account.client.clone(),
            self.book.clone(),
            self.config.clone(),
        ))
    }

    pub fn task_context(&self, account: &Account) -> TaskContext {
        TaskContext {
            owner: account.address,
            client: account.client.clone(),
            ledger: self.ledger_for(account),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// Per-account handles for one action attempt.
///
/// Generic over the middleware so the contract calls can run against any
/// client stack; the bot itself uses [`SignerClient`].
pub struct TaskContext<M = SignerClient> {
    pub owner: Address,
    pub client: Arc<M>,
    pub ledger: Arc<dyn TokenLedger>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<R2Config>,
}

impl<M> Clone for TaskContext<M> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            client: self.client.clone(),
            ledger: self.ledger.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }
}

/// A confirmed action.
#[derive(Debug, Clone)]
pub struct Completed {
    pub summary: String,
    pub tx_hash: H256,
}

impl<M> TaskContext<M> {
    /// Logs and notifies the outcome of one action attempt.
    pub async fn conclude(&self, action: &str, outcome: Result<Completed>) -> TaskResult {
        match outcome {
            Ok(done) => {
                let hash = format!("{:?}", done.tx_hash);
                let url = self.config.tx_url(&hash);
                info!("{} successful! {} | {}", action, done.summary, url);
                self.notifier
                    .notify(&format!(
                        "✅ {} successful for wallet {:?}\n{}\nTransaction: {}",
                        action, self.owner, done.summary, url
                    ))
                    .await;
                TaskResult::success(done.summary, hash)
            }
            Err(e) => {
                if e.downcast_ref::<ActionError>().is_some() {
                    warn!("{} skipped: {}", action, e);
                } else {
                    error!("{} failed: {:#}", action, e);
                }
                self.notifier
                    .notify(&format!(
                        "❌ {} failed for wallet {:?}: {}",
                        action, self.owner, e
                    ))
                    .await;
                TaskResult::failure(e.to_string())
            }
        }
    }
}

/// Amount to commit from `token` at `percentage` of its balance.
pub fn plan_amount(token: &TokenDescriptor, percentage: u32) -> Result<U256, ActionError> {
    if token.balance.is_zero() {
        return Err(ActionError::EmptyBalance {
            symbol: token.symbol.clone(),
        });
    }

    let amount = percent_of(token.balance, percentage);
    if amount.is_zero() {
        return Err(ActionError::ZeroAmount {
            symbol: token.symbol.clone(),
            percentage,
        });
    }

    info!(
        "Using {}% of {} {}: {}",
        percentage,
        format_amount(token.balance, token.decimals),
        token.symbol,
        format_amount(amount, token.decimals)
    );
    Ok(amount)
}

/// Both balances are checked for emptiness before either amount is sized.
pub fn plan_pair_amounts(
    a: &TokenDescriptor,
    b: &TokenDescriptor,
    percentage: u32,
) -> Result<(U256, U256), ActionError> {
    for token in [a, b] {
        if token.balance.is_zero() {
            return Err(ActionError::EmptyBalance {
                symbol: token.symbol.clone(),
            });
        }
    }
    Ok((plan_amount(a, percentage)?, plan_amount(b, percentage)?))
}

/// Approves `amount` for `spender` unless the current allowance covers it.
pub async fn ensure_allowance(
    ledger: &dyn TokenLedger,
    token: &TokenDescriptor,
    owner: Address,
    spender: Address,
    amount: U256,
) -> Result<(), ActionError> {
    let approval_failed = |e: anyhow::Error| ActionError::ApprovalFailed {
        symbol: token.symbol.clone(),
        reason: e.to_string(),
    };

    let current = ledger
        .allowance(token.address, owner, spender)
        .await
        .map_err(approval_failed)?;

    if current >= amount {
        info!("{} allowance already sufficient", token.symbol);
        return Ok(());
    }

    info!("Approving {} for {:?}", token.symbol, spender);
    ledger
        .approve(token.address, spender, amount)
        .await
        .map_err(approval_failed)?;
    info!("{} approved", token.symbol);
    Ok(())
}

pub type R2Task = dyn Task<TaskContext> + Send + Sync;

/// Builds the task for a confirmed menu selection.
pub fn build_task(request: &ActionRequest, config: &R2Config) -> Box<R2Task> {
    let percentage = request.params.percentage();
    match request.kind {
        ActionKind::Swap(direction) => {
            let (token_in, token_out) = match direction {
                SwapDirection::R2ToUsdc => (config.tokens.r2, config.tokens.usdc),
                SwapDirection::UsdcToR2 => (config.tokens.usdc, config.tokens.r2),
            };
            Box::new(SwapTask::new(token_in, token_out, percentage))
        }
        ActionKind::AddLiquidity(pair) => {
            Box::new(AddLiquidityTask::new(config.route(pair), percentage))
        }
        ActionKind::RemoveLiquidity(pair) => {
            Box::new(RemoveLiquidityTask::new(config.route(pair), percentage))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use core_logic::RunParameters;

    fn descriptor(symbol: &str, balance: u64) -> TokenDescriptor {
        TokenDescriptor {
            address: Address::from_low_u64_be(1),
            symbol: symbol.to_string(),
            decimals: 18,
            balance: U256::from(balance),
        }
    }

    #[test]
    fn test_plan_amount() {
        assert_eq!(plan_amount(&descriptor("R2", 1000), 10), Ok(U256::from(100)));
        assert_eq!(
            plan_amount(&descriptor("R2", 0), 10),
            Err(ActionError::EmptyBalance {
                symbol: "R2".to_string()
            })
        );
        assert_eq!(
            plan_amount(&descriptor("R2", 10), 5),
            Err(ActionError::ZeroAmount {
                symbol: "R2".to_string(),
                percentage: 5
            })
        );
    }

    #[test]
    fn test_plan_pair_amounts_checks_both_balances_first() {
        // A would round to zero, but B's empty balance is reported
        let err = plan_pair_amounts(&descriptor("R2", 10), &descriptor("USDC", 0), 5).unwrap_err();
        assert_eq!(
            err,
            ActionError::EmptyBalance {
                symbol: "USDC".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_ensure_allowance_skips_when_sufficient() {
        let token = descriptor("R2", 1000);
        let spender = Address::from_low_u64_be(7);
        let mut ledger = FakeLedger::default();
        ledger
            .allowances
            .insert((token.address, spender), U256::from(500));

        ensure_allowance(&ledger, &token, Address::zero(), spender, U256::from(500))
            .await
            .unwrap();
        assert!(ledger.approvals().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_allowance_approves_exact_amount() {
        let token = descriptor("R2", 1000);
        let spender = Address::from_low_u64_be(7);
        let ledger = FakeLedger::default();

        ensure_allowance(&ledger, &token, Address::zero(), spender, U256::from(250))
            .await
            .unwrap();
        assert_eq!(
            ledger.approvals(),
            vec![(token.address, spender, U256::from(250))]
        );
    }

    #[tokio::test]
    async fn test_ensure_allowance_failure() {
        let token = descriptor("R2", 1000);
        let ledger = FakeLedger {
            fail_approve: true,
            ..Default::default()
        };

        let err = ensure_allowance(&ledger, &token, Address::zero(), Address::zero(), U256::one())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::ApprovalFailed { ref symbol, .. } if symbol == "R2"));
    }

    #[tokio::test]
    async fn test_conclude_failure_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = context(Arc::new(FakeLedger::default()), notifier.clone());

        let result = ctx
            .conclude(
                "Swap",
                Err(ActionError::EmptyBalance {
                    symbol: "R2".to_string(),
                }
                .into()),
            )
            .await;

        assert!(!result.success);
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("❌ Swap failed"));
        assert!(messages[0].contains("No R2 balance available"));
    }

    #[tokio::test]
    async fn test_conclude_success_links_explorer() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = context(Arc::new(FakeLedger::default()), notifier.clone());

        let result = ctx
            .conclude(
                "Swap",
                Ok(Completed {
                    summary: "1 R2 -> USDC".to_string(),
                    tx_hash: H256::from_low_u64_be(0xab),
                }),
            )
            .await;

        assert!(result.success);
        let hash = result.tx_hash.unwrap();
        assert!(hash.ends_with("ab"));
        let messages = notifier.messages.lock().unwrap();
        assert!(messages[0].contains(&format!("https://sepolia.etherscan.io/tx/{}", hash)));
    }

    #[test]
    fn test_build_task_names() {
        let config = R2Config::builtin().unwrap();
        let params = RunParameters::new(10, 1, 5).unwrap();

        let swap = build_task(
            &ActionRequest {
                kind: ActionKind::Swap(SwapDirection::UsdcToR2),
                params,
            },
            &config,
        );
        assert_eq!(swap.name(), "swap");

        let remove = build_task(
            &ActionRequest {
                kind: ActionKind::RemoveLiquidity(crate::venue::Pair::R2Usdc),
                params,
            },
            &config,
        );
        assert_eq!(remove.name(), "remove_liquidity");
    }
}
