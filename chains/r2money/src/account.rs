use crate::contracts::SignerClient;
use core_logic::{PrivateKey, WalletError};
use ethers::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A loaded key bound to the shared RPC provider.
#[derive(Clone)]
pub struct Account {
    pub index: usize,
    pub address: Address,
    pub client: Arc<SignerClient>,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.address)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("index", &self.index)
            .field("address", &self.address)
            .finish()
    }
}

/// Derives one account per key, in key order.
///
/// Keys that do not yield a signer are skipped with a warning; an empty
/// result is an error.
pub fn build_accounts(
    keys: &[PrivateKey],
    provider: &Provider<Http>,
    chain_id: u64,
) -> Result<Vec<Account>, WalletError> {
    let mut accounts = Vec::with_capacity(keys.len());

    for (idx, key) in keys.iter().enumerate() {
        match key.expose().parse::<LocalWallet>() {
            Ok(wallet) => {
                let wallet = wallet.with_chain_id(chain_id);
                let address = wallet.address();
                let client = SignerMiddleware::new(provider.clone(), wallet);
                accounts.push(Account {
                    index: accounts.len(),
                    address,
                    client: Arc::new(client),
                });
            }
            Err(e) => {
                let err = WalletError::DerivationFailed {
                    index: idx,
                    reason: e.to_string(),
                };
                warn!("Skipping key {}...: {}", key.preview(), err);
            }
        }
    }

    if accounts.is_empty() {
        return Err(WalletError::NoValidWallets {
            attempted: keys.len(),
        });
    }

    Ok(accounts)
}
