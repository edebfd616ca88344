use crate::config::R2Config;
use crate::token::{TokenDescriptor, TokenLedger};
use crate::utils::amount::format_amount;
use colored::*;
use ethers::types::Address;

const STAKED_NOTE: &str = "Not in wallet (likely staked/farmed)";

/// One line of the balance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub name: &'static str,
    pub token: Address,
    /// Shown instead of a zero balance.
    pub zero_note: Option<&'static str>,
}

/// Underlying tokens first, then LP tokens.
pub fn balance_rows(config: &R2Config) -> Vec<BalanceRow> {
    let t = &config.tokens;
    let lp = &config.lp_tokens;
    let row = |name, token| BalanceRow {
        name,
        token,
        zero_note: None,
    };

    vec![
        row("R2", t.r2),
        row("USDC", t.usdc),
        row("R2USD", t.r2usd),
        row("sR2USD", t.sr2usd),
        row("R2-USDC LP", lp.r2_usdc),
        BalanceRow {
            name: "R2-R2USD LP",
            token: lp.r2_r2usd,
            zero_note: Some(STAKED_NOTE),
        },
        row("USDC-R2USD LP", lp.usdc_r2usd),
        row("sR2USD-R2USD LP", lp.r2usd_sr2usd),
    ]
}

pub fn render_balance(row: &BalanceRow, token: &TokenDescriptor) -> String {
    match row.zero_note {
        Some(note) if token.balance.is_zero() => format!("{}: {}", row.name, note),
        _ => format!(
            "{}: {}",
            row.name,
            format_amount(token.balance, token.decimals)
        ),
    }
}

/// Prints every row for `owner`; unreadable tokens show a zero balance.
pub async fn display_balances(ledger: &dyn TokenLedger, config: &R2Config, owner: Address) {
    println!("{}", format!("Balances for {:?}", owner).cyan().bold());
    for row in balance_rows(config) {
        let token = ledger.inspect(row.token, owner).await;
        println!("  {}", render_balance(&row, &token));
    }
}
