use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File};
use core_logic::config::ChainConfig;
use ethers::types::Address;
use serde::Deserialize;

use crate::venue::{Pair, PairRoute, Venue};

const DEFAULT_RPC_URL: &str = "https://eth-sepolia.public.blastapi.io";
const DEFAULT_CHAIN_ID: i64 = 11155111;
const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

const R2_TOKEN: &str = "0xb816bB88f836EA75Ca4071B46FF285f690C43bb7";
const USDC_TOKEN: &str = "0x8BEbFCBe5468F146533C182dF3DFbF5ff9BE00E2";
const R2USD_TOKEN: &str = "0x9e8FF356D35a2Da385C546d6Bf1D77ff85133365";
const SR2USD_TOKEN: &str = "0x006CbF409CA275bA022111dB32BDAE054a97d488";

const R2_USDC_LP: &str = "0xCdfDD7dD24bABDD05A2ff4dfcf06384c5Ad661a9";
const R2_R2USD_LP: &str = "0x9Ae18109312c1452D3f0952d7eC1e26D15211FE9";
const USDC_R2USD_LP: &str = "0x47d1B0623bB3E557bF8544C159c9ae51D091F8a2";
const R2USD_SR2USD_LP: &str = "0xe85A06C238439F981c90b2C91393b2F3c46e27FC";

const ROUTER: &str = "0xeE567Fe1712Faf6149d80dA1E6934E354124CfE3";
const USDC_R2USD_POOL: &str = "0x47d1B0623bB3E557bF8544C159c9ae51D091F8a2";
const R2USD_SR2USD_POOL: &str = "0xe85A06C238439F981c90b2C91393b2F3c46e27FC";

#[derive(Debug, Deserialize, Clone)]
pub struct TokenAddresses {
    pub r2: Address,
    pub usdc: Address,
    pub r2usd: Address,
    pub sr2usd: Address,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LpAddresses {
    pub r2_usdc: Address,
    pub r2_r2usd: Address,
    pub usdc_r2usd: Address,
    pub r2usd_sr2usd: Address,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VenueAddresses {
    /// Uniswap-V2 style router serving the R2 pairs
    pub router: Address,
    pub usdc_r2usd_pool: Address,
    pub r2usd_sr2usd_pool: Address,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GasLimits {
    pub swap: u64,
    pub liquidity: u64,
}

/// Slippage tolerances in basis points.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SlippageConfig {
    pub swap_bps: u32,
    pub liquidity_bps: u32,
}

/// Network and contract table for the R2 deployment.
///
/// Built once at startup and shared read-only with every task.
#[derive(Debug, Deserialize, Clone)]
pub struct R2Config {
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: String,
    pub deadline_secs: u64,
    pub tokens: TokenAddresses,
    pub lp_tokens: LpAddresses,
    pub venues: VenueAddresses,
    pub gas: GasLimits,
    pub slippage: SlippageConfig,
}

impl R2Config {
    /// Loads `path` on top of the built-in deployment table.
    ///
    /// A missing file is not an error; every key falls back to its default.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    /// The built-in Sepolia deployment.
    pub fn builtin() -> Result<Self> {
        let settings = Self::defaults()?.build()?;
        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("rpc_url", DEFAULT_RPC_URL)?
            .set_default("chain_id", DEFAULT_CHAIN_ID)?
            .set_default("explorer_url", DEFAULT_EXPLORER_URL)?
            .set_default("deadline_secs", 1200i64)?
            .set_default("tokens.r2", R2_TOKEN)?
            .set_default("tokens.usdc", USDC_TOKEN)?
            .set_default("tokens.r2usd", R2USD_TOKEN)?
            .set_default("tokens.sr2usd", SR2USD_TOKEN)?
            .set_default("lp_tokens.r2_usdc", R2_USDC_LP)?
            .set_default("lp_tokens.r2_r2usd", R2_R2USD_LP)?
            .set_default("lp_tokens.usdc_r2usd", USDC_R2USD_LP)?
            .set_default("lp_tokens.r2usd_sr2usd", R2USD_SR2USD_LP)?
            .set_default("venues.router", ROUTER)?
            .set_default("venues.usdc_r2usd_pool", USDC_R2USD_POOL)?
            .set_default("venues.r2usd_sr2usd_pool", R2USD_SR2USD_POOL)?
            .set_default("gas.swap", 350_000i64)?
            .set_default("gas.liquidity", 750_000i64)?
            .set_default("slippage.swap_bps", 50i64)?
            .set_default("slippage.liquidity_bps", 500i64)?)
    }

    pub fn chain(&self) -> ChainConfig {
        ChainConfig {
            name: "Sepolia".to_string(),
            rpc_endpoint: self.rpc_url.clone(),
            chain_id: self.chain_id,
            explorer_url: self.explorer_url.clone(),
        }
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        self.chain().tx_url(tx_hash)
    }

    /// Resolves a pair to its tokens, LP token and venue.
    ///
    /// Stable pools list their coins in pool order, which is the reverse of
    /// the display order for both deployed pools.
    pub fn route(&self, pair: Pair) -> PairRoute {
        let t = &self.tokens;
        let lp = &self.lp_tokens;
        let v = &self.venues;

        match pair {
            Pair::R2Usdc => PairRoute {
                pair,
                token_a: t.r2,
                token_b: t.usdc,
                lp_token: lp.r2_usdc,
                venue: Venue::Router { router: v.router },
            },
            Pair::R2R2usd => PairRoute {
                pair,
                token_a: t.r2,
                token_b: t.r2usd,
                lp_token: lp.r2_r2usd,
                venue: Venue::Router { router: v.router },
            },
            Pair::UsdcR2usd => PairRoute {
                pair,
                token_a: t.usdc,
                token_b: t.r2usd,
                lp_token: lp.usdc_r2usd,
                venue: Venue::StablePool {
                    pool: v.usdc_r2usd_pool,
                    coins: [t.r2usd, t.usdc],
                },
            },
            Pair::R2usdSr2usd => PairRoute {
                pair,
                token_a: t.r2usd,
                token_b: t.sr2usd,
                lp_token: lp.r2usd_sr2usd,
                venue: Venue::StablePool {
                    pool: v.r2usd_sr2usd_pool,
                    coins: [t.sr2usd, t.r2usd],
                },
            },
        }
    }
}
