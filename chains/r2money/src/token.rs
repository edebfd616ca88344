use crate::config::R2Config;
use crate::contracts::{Erc20, SignerClient};
use crate::utils::tx::send_and_confirm;
use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// Symbol, decimals and holder balance of one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub balance: U256,
}

/// Labels used when a token's metadata cannot be read.
#[derive(Debug, Clone)]
pub struct TokenBook {
    known: Vec<(Address, &'static str)>,
}

impl TokenBook {
    pub fn from_config(config: &R2Config) -> Self {
        let lp = &config.lp_tokens;
        Self {
            known: vec![
                (lp.r2_usdc, "R2-USDC LP"),
                (lp.r2_r2usd, "R2-R2USD LP"),
                (lp.usdc_r2usd, "USDC-R2USD LP"),
                (lp.r2usd_sr2usd, "R2USD-sR2USD LP"),
            ],
        }
    }

    /// Placeholder descriptor: 18 decimals, zero balance.
    pub fn fallback(&self, token: Address) -> TokenDescriptor {
        let symbol = self
            .known
            .iter()
            .find(|(address, _)| *address == token)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| {
                let hex = format!("{:?}", token);
                format!("Unknown ({}...)", &hex[..6])
            });

        TokenDescriptor {
            address: token,
            symbol,
            decimals: 18,
            balance: U256::zero(),
        }
    }
}

/// Read and approve access to ERC-20 tokens for one owner.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Never fails; unreadable tokens resolve to the book's fallback.
    async fn inspect(&self, token: Address, owner: Address) -> TokenDescriptor;

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Approves exactly `amount` and waits for confirmation.
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<H256>;
}

/// [`TokenLedger`] backed by on-chain ERC-20 calls.
pub struct Erc20Ledger {
    client: Arc<SignerClient>,
    book: Arc<TokenBook>,
    config: Arc<R2Config>,
}

impl Erc20Ledger {
    pub fn new(client: Arc<SignerClient>, book: Arc<TokenBook>, config: Arc<R2Config>) -> Self {
        Self {
            client,
            book,
            config,
        }
    }

    async fn read(&self, token: Address, owner: Address) -> Result<TokenDescriptor> {
        let erc20 = Erc20::new(token, self.client.clone());
        let symbol = erc20.symbol().call().await?;
        let decimals = erc20.decimals().call().await?;
        let balance = erc20.balance_of(owner).call().await?;

        Ok(TokenDescriptor {
            address: token,
            symbol,
            decimals,
            balance,
        })
    }
}

#[async_trait]
impl TokenLedger for Erc20Ledger {
    async fn inspect(&self, token: Address, owner: Address) -> TokenDescriptor {
        match self.read(token, owner).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                let fallback = self.book.fallback(token);
                warn!("Could not read token {:?} ({}), using {}", token, e, fallback.symbol);
                fallback
            }
        }
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let erc20 = Erc20::new(token, self.client.clone());
        Ok(erc20.allowance(owner, spender).call().await?)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<H256> {
        let erc20 = Erc20::new(token, self.client.clone());
        debug!("Approving {} of {:?} for {:?}", amount, token, spender);
        let call = erc20.approve(spender, amount);
        send_and_confirm(call, "approval", &self.config).await
    }
}
