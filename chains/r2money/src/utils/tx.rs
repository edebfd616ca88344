use crate::config::R2Config;
use anyhow::{anyhow, bail, Context, Result};
use ethers::abi::Detokenize;
use ethers::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Unix timestamp `secs` from now, as a contract deadline.
pub fn deadline_from_now(secs: u64) -> Result<U256> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(U256::from(now + secs))
}

/// Submits `call` and waits for one confirmation.
///
/// A receipt whose status is not 1 is an error.
pub async fn send_and_confirm<M, D>(
    call: ContractCall<M, D>,
    label: &str,
    config: &R2Config,
) -> Result<H256>
where
    M: Middleware + 'static,
    D: Detokenize,
{
    let pending = call
        .send()
        .await
        .map_err(|e| anyhow!("{} submission failed: {}", label, e))?;

    let tx_hash = pending.tx_hash();
    info!(
        "{} transaction sent: {}",
        label,
        config.tx_url(&format!("{:?}", tx_hash))
    );

    let receipt = pending
        .await?
        .with_context(|| format!("{} transaction {:?} dropped", label, tx_hash))?;

    if receipt.status != Some(U64::from(1)) {
        bail!("{} transaction {:?} reverted", label, tx_hash);
    }

    info!(
        "{} confirmed in block {}",
        label,
        receipt.block_number.unwrap_or_default()
    );
    Ok(receipt.transaction_hash)
}
