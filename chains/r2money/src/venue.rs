//! Liquidity venues: the V2 router and the stable pools.

use crate::config::R2Config;
use crate::contracts::{StableSwapPool, UniswapV2Router};
use crate::utils::amount::{apply_slippage, proportional_share};
use crate::utils::tx::{deadline_from_now, send_and_confirm};
use anyhow::Result;
use ethers::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Liquidity pairs offered in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pair {
    R2Usdc,
    R2R2usd,
    UsdcR2usd,
    R2usdSr2usd,
}

impl Pair {
    pub const ALL: [Pair; 4] = [
        Pair::R2Usdc,
        Pair::R2R2usd,
        Pair::UsdcR2usd,
        Pair::R2usdSr2usd,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Pair::R2Usdc => "R2-USDC",
            Pair::R2R2usd => "R2-R2USD",
            Pair::UsdcR2usd => "USDC-R2USD",
            Pair::R2usdSr2usd => "R2USD-sR2USD",
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a pair's liquidity lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    /// Uniswap-V2 style router; token order follows the pair.
    Router { router: Address },
    /// Two-coin stable pool; amounts are passed in `coins` order.
    StablePool { pool: Address, coins: [Address; 2] },
}

/// Everything needed to act on one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRoute {
    pub pair: Pair,
    pub token_a: Address,
    pub token_b: Address,
    pub lp_token: Address,
    pub venue: Venue,
}

impl Venue {
    /// Contract that must hold the allowance for deposits and withdrawals.
    pub fn spender(&self) -> Address {
        match self {
            Venue::Router { router } => *router,
            Venue::StablePool { pool, .. } => *pool,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Venue::Router { .. } => "router",
            Venue::StablePool { .. } => "stable pool",
        }
    }

    /// Deposits `amount_a`/`amount_b` of the route's tokens.
    pub async fn add_liquidity<M: Middleware + 'static>(
        &self,
        client: Arc<M>,
        route: &PairRoute,
        amount_a: U256,
        amount_b: U256,
        receiver: Address,
        config: &R2Config,
    ) -> Result<H256> {
        match *self {
            Venue::Router { router } => {
                let router = UniswapV2Router::new(router, client);
                let deadline = deadline_from_now(config.deadline_secs)?;
                let call = router
                    .add_liquidity(
                        route.token_a,
                        route.token_b,
                        amount_a,
                        amount_b,
                        U256::zero(),
                        U256::zero(),
                        receiver,
                        deadline,
                    )
                    .gas(config.gas.liquidity);

                send_and_confirm(call, "add liquidity", config).await
            }
            Venue::StablePool { pool, coins } => {
                let pool = StableSwapPool::new(pool, client);
                let amounts = coin_order_amounts(coins, route, amount_a, amount_b).to_vec();

                let estimate = match pool.calc_token_amount(amounts.clone(), true).call().await {
                    Ok(estimate) => estimate,
                    Err(e) => {
                        warn!("LP estimate unavailable, minimum mint set to 0: {}", e);
                        U256::zero()
                    }
                };
                let min_mint = apply_slippage(estimate, config.slippage.liquidity_bps);
                info!("Expected LP tokens: {}, minimum: {}", estimate, min_mint);

                let call = pool
                    .add_liquidity(amounts, min_mint, receiver)
                    .gas(config.gas.liquidity);

                send_and_confirm(call, "add liquidity", config).await
            }
        }
    }

    /// Burns `lp_amount` of the route's LP token.
    pub async fn remove_liquidity<M: Middleware + 'static>(
        &self,
        client: Arc<M>,
        route: &PairRoute,
        lp_amount: U256,
        receiver: Address,
        config: &R2Config,
    ) -> Result<H256> {
        match *self {
            Venue::Router { router } => {
                let router = UniswapV2Router::new(router, client);
                let deadline = deadline_from_now(config.deadline_secs)?;
                let call = router
                    .remove_liquidity(
                        route.token_a,
                        route.token_b,
                        lp_amount,
                        U256::zero(),
                        U256::zero(),
                        receiver,
                        deadline,
                    )
                    .gas(config.gas.liquidity);

                send_and_confirm(call, "remove liquidity", config).await
            }
            Venue::StablePool { pool, .. } => {
                let pool = StableSwapPool::new(pool, client);

                let reserves = pool.get_balances().call().await;
                let supply = pool.total_supply().call().await;
                let mins = match (reserves, supply) {
                    (Ok(reserves), Ok(supply)) => min_withdrawals(
                        &reserves,
                        lp_amount,
                        supply,
                        config.slippage.liquidity_bps,
                    ),
                    _ => {
                        warn!("Pool reserves unavailable, minimum withdrawals set to 0");
                        vec![U256::zero(); 2]
                    }
                };
                info!("Minimum withdrawals: {:?}", mins);

                let call = pool
                    .remove_liquidity_imbalance(mins, lp_amount, receiver)
                    .gas(config.gas.liquidity);

                send_and_confirm(call, "remove liquidity", config).await
            }
        }
    }
}

/// Maps pair-ordered amounts onto the pool's coin order.
pub fn coin_order_amounts(
    coins: [Address; 2],
    route: &PairRoute,
    amount_a: U256,
    amount_b: U256,
) -> [U256; 2] {
    coins.map(|coin| {
        if coin == route.token_a {
            amount_a
        } else if coin == route.token_b {
            amount_b
        } else {
            U256::zero()
        }
    })
}

/// Slippage-adjusted share of each reserve for burning `burn` LP out of
/// `supply`. All minimums are zero when the supply is zero.
pub fn min_withdrawals(
    reserves: &[U256],
    burn: U256,
    supply: U256,
    slippage_bps: u32,
) -> Vec<U256> {
    let mut mins: Vec<U256> = reserves
        .iter()
        .take(2)
        .map(|reserve| {
            proportional_share(*reserve, burn, supply)
                .map(|share| apply_slippage(share, slippage_bps))
                .unwrap_or_default()
        })
        .collect();
    mins.resize(2, U256::zero());
    mins
}
