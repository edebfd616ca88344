use crate::task::{ensure_allowance, plan_amount, Completed, Task, TaskContext, TaskResult};
use crate::utils::amount::format_amount;
use crate::venue::PairRoute;
use anyhow::Result;
use async_trait::async_trait;
use ethers::providers::Middleware;
use tracing::info;

/// Burns a percentage of the pair's LP balance.
pub struct RemoveLiquidityTask {
    route: PairRoute,
    percentage: u32,
}

impl RemoveLiquidityTask {
    pub fn new(route: PairRoute, percentage: u32) -> Self {
        Self { route, percentage }
    }

    async fn execute<M: Middleware + 'static>(&self, ctx: &TaskContext<M>) -> Result<Completed> {
        let route = &self.route;

        let lp = ctx.ledger.inspect(route.lp_token, ctx.owner).await;
        info!(
            "Remove liquidity from {} via {}",
            route.pair,
            route.venue.kind()
        );

        let burn = plan_amount(&lp, self.percentage)?;
        ensure_allowance(
            ctx.ledger.as_ref(),
            &lp,
            ctx.owner,
            route.venue.spender(),
            burn,
        )
        .await?;

        let tx_hash = route
            .venue
            .remove_liquidity(ctx.client.clone(), route, burn, ctx.owner, &ctx.config)
            .await?;

        Ok(Completed {
            summary: format!(
                "Removed {} {} from {}",
                format_amount(burn, lp.decimals),
                lp.symbol,
                route.pair
            ),
            tx_hash,
        })
    }
}

#[async_trait]
impl<M: Middleware + 'static> Task<TaskContext<M>> for RemoveLiquidityTask {
    fn name(&self) -> &str {
        "remove_liquidity"
    }

    async fn run(&self, ctx: TaskContext<M>) -> Result<TaskResult> {
        let outcome = self.execute(&ctx).await;
        Ok(ctx.conclude("Remove liquidity", outcome).await)
    }
}
