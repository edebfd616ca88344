use crate::contracts::UniswapV2Router;
use crate::task::{ensure_allowance, plan_amount, Completed, Task, TaskContext, TaskResult};
use crate::utils::amount::{apply_slippage, format_amount};
use crate::utils::tx::{deadline_from_now, send_and_confirm};
use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::*;
use tracing::{info, warn};

/// Exact-input swap of a percentage of `token_in` through the router.
pub struct SwapTask {
    token_in: Address,
    token_out: Address,
    percentage: u32,
}

impl SwapTask {
    pub fn new(token_in: Address, token_out: Address, percentage: u32) -> Self {
        Self {
            token_in,
            token_out,
            percentage,
        }
    }

    async fn execute<M: Middleware + 'static>(&self, ctx: &TaskContext<M>) -> Result<Completed> {
        let config = &ctx.config;
        let router_address = config.venues.router;

        let token_in = ctx.ledger.inspect(self.token_in, ctx.owner).await;
        let token_out = ctx.ledger.inspect(self.token_out, ctx.owner).await;
        info!("Swap {} -> {}", token_in.symbol, token_out.symbol);

        let amount_in = plan_amount(&token_in, self.percentage)?;
        ensure_allowance(
            ctx.ledger.as_ref(),
            &token_in,
            ctx.owner,
            router_address,
            amount_in,
        )
        .await?;

        let router = UniswapV2Router::new(router_address, ctx.client.clone());
        let path = vec![self.token_in, self.token_out];

        let quoted = match router.get_amounts_out(amount_in, path.clone()).call().await {
            Ok(amounts) => amounts.get(1).copied().unwrap_or_default(),
            Err(e) => {
                warn!("Quote unavailable, minimum output set to 0: {}", e);
                U256::zero()
            }
        };
        let min_out = apply_slippage(quoted, config.slippage.swap_bps);
        info!(
            "Expected {} {}, minimum {}",
            format_amount(quoted, token_out.decimals),
            token_out.symbol,
            format_amount(min_out, token_out.decimals)
        );

        let deadline = deadline_from_now(config.deadline_secs)?;
        let call = router
            .swap_exact_tokens_for_tokens(amount_in, min_out, path, ctx.owner, deadline)
            .gas(config.gas.swap);
        let tx_hash = send_and_confirm(call, "swap", config).await?;

        Ok(Completed {
            summary: format!(
                "Swapped {} {} for {}",
                format_amount(amount_in, token_in.decimals),
                token_in.symbol,
                token_out.symbol
            ),
            tx_hash,
        })
    }
}

#[async_trait]
impl<M: Middleware + 'static> Task<TaskContext<M>> for SwapTask {
    fn name(&self) -> &str {
        "swap"
    }

    async fn run(&self, ctx: TaskContext<M>) -> Result<TaskResult> {
        let outcome = self.execute(&ctx).await;
        Ok(ctx.conclude("Swap", outcome).await)
    }
}
