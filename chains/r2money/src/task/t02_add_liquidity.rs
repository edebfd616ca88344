use crate::task::{ensure_allowance, plan_pair_amounts, Completed, Task, TaskContext, TaskResult};
use crate::utils::amount::format_amount;
use crate::venue::PairRoute;
use anyhow::Result;
use async_trait::async_trait;
use ethers::providers::Middleware;
use tracing::info;

/// Deposits a percentage of both pair tokens into the pair's venue.
pub struct AddLiquidityTask {
    route: PairRoute,
    percentage: u32,
}

impl AddLiquidityTask {
    pub fn new(route: PairRoute, percentage: u32) -> Self {
        Self { route, percentage }
    }

    async fn execute<M: Middleware + 'static>(&self, ctx: &TaskContext<M>) -> Result<Completed> {
        let route = &self.route;
        let spender = route.venue.spender();

        let token_a = ctx.ledger.inspect(route.token_a, ctx.owner).await;
        let token_b = ctx.ledger.inspect(route.token_b, ctx.owner).await;
        info!(
            "Add liquidity to {} via {}",
            route.pair,
            route.venue.kind()
        );

        let (amount_a, amount_b) = plan_pair_amounts(&token_a, &token_b, self.percentage)?;

        ensure_allowance(ctx.ledger.as_ref(), &token_a, ctx.owner, spender, amount_a).await?;
        ensure_allowance(ctx.ledger.as_ref(), &token_b, ctx.owner, spender, amount_b).await?;

        let tx_hash = route
            .venue
            .add_liquidity(
                ctx.client.clone(),
                route,
                amount_a,
                amount_b,
                ctx.owner,
                &ctx.config,
            )
            .await?;

        Ok(Completed {
            summary: format!(
                "Added {} {} + {} {} to {}",
                format_amount(amount_a, token_a.decimals),
                token_a.symbol,
                format_amount(amount_b, token_b.decimals),
                token_b.symbol,
                route.pair
            ),
            tx_hash,
        })
    }
}

#[async_trait]
impl<M: Middleware + 'static> Task<TaskContext<M>> for AddLiquidityTask {
    fn name(&self) -> &str {
        "add_liquidity"
    }

    async fn run(&self, ctx: TaskContext<M>) -> Result<TaskResult> {
        let outcome = self.execute(&ctx).await;
        Ok(ctx.conclude("Add liquidity", outcome).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::R2Config;
    use crate::task::testing::*;
    use crate::venue::Pair;
    use ethers::abi::{ParamType, Token};
    use ethers::types::U256;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_second_token_sends_nothing() {
        let config = R2Config::builtin().unwrap();
        let route = config.route(Pair::R2R2usd);
        let ledger = Arc::new(FakeLedger::default().with_token(config.tokens.r2, "R2", 1000));
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = context(ledger.clone(), notifier.clone());

        let result = AddLiquidityTask::new(route, 20).run(ctx).await.unwrap();

        assert!(!result.success);
        assert!(result.message.contains("No UNKNOWN balance"));
        assert!(ledger.approvals().is_empty());
        assert!(notifier.messages.lock().unwrap()[0].starts_with("❌ Add liquidity failed"));
    }

    #[tokio::test]
    async fn test_second_approval_failure_after_first() {
        let config = R2Config::builtin().unwrap();
        let route = config.route(Pair::R2Usdc);
        let spender = route.venue.spender();

        let mut ledger = FakeLedger::default()
            .with_token(config.tokens.r2, "R2", 1000)
            .with_token(config.tokens.usdc, "USDC", 2000);
        // R2 already covered, so the only approval attempt is for USDC
        ledger
            .allowances
            .insert((config.tokens.r2, spender), U256::from(1000));
        ledger.fail_approve = true;
        let ctx = context(Arc::new(ledger), Arc::new(RecordingNotifier::default()));

        let result = AddLiquidityTask::new(route, 50).run(ctx).await.unwrap();

        assert!(!result.success);
        assert!(result.message.contains("Approval of USDC failed"));
    }

    fn stable_deposit_params() -> Vec<ParamType> {
        vec![
            ParamType::Array(Box::new(ParamType::Uint(256))),
            ParamType::Uint(256),
            ParamType::Address,
        ]
    }

    fn stable_ledger(config: &R2Config) -> Arc<FakeLedger> {
        Arc::new(
            FakeLedger::default()
                .with_token(config.tokens.usdc, "USDC", 1000)
                .with_token(config.tokens.r2usd, "R2USD", 2000),
        )
    }

    #[tokio::test]
    async fn test_stable_deposit_uses_estimate_minus_slippage() {
        let config = R2Config::builtin().unwrap();
        let route = config.route(Pair::UsdcR2usd);
        let ledger = stable_ledger(&config);
        let (client, mock) = CaptureClient::new();
        push_call_result(&mock, &[Token::Uint(U256::from(10_000))]);
        let ctx = capture_context(
            ledger.clone(),
            Arc::new(RecordingNotifier::default()),
            client.clone(),
        );
        let owner = ctx.owner;

        let result = AddLiquidityTask::new(route, 10).run(ctx).await.unwrap();

        assert!(!result.success);
        assert!(result.message.contains("add liquidity submission failed"));
        assert_eq!(ledger.approvals().len(), 2);
        assert_eq!(client.sent()[0].to_addr(), Some(&config.venues.usdc_r2usd_pool));

        let args = client.sent_args(&stable_deposit_params());
        // pool coin order is [R2USD, USDC]
        assert_eq!(args[0], uints(&[200, 100]));
        assert_eq!(args[1], Token::Uint(U256::from(9_500)));
        assert_eq!(args[2], Token::Address(owner));
    }

    #[tokio::test]
    async fn test_stable_deposit_without_estimate_mints_any_amount() {
        let config = R2Config::builtin().unwrap();
        let route = config.route(Pair::UsdcR2usd);
        let (client, _mock) = CaptureClient::new();
        let ctx = capture_context(
            stable_ledger(&config),
            Arc::new(RecordingNotifier::default()),
            client.clone(),
        );

        let result = AddLiquidityTask::new(route, 50).run(ctx).await.unwrap();

        assert!(!result.success);
        let args = client.sent_args(&stable_deposit_params());
        assert_eq!(args[0], uints(&[1000, 500]));
        assert_eq!(args[1], Token::Uint(U256::zero()));
    }
}
