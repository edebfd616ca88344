use anyhow::Result;
use clap::Parser;
use colored::*;
use core_logic::{
    setup_logger, AccountReport, ConfigError, Notifier, SequentialRunner, WalletManager,
};
use dotenv::dotenv;
use ethers::prelude::*;
use r2money::account::{build_accounts, Account};
use r2money::balances::display_balances;
use r2money::bot::notifier_from_env;
use r2money::config::R2Config;
use r2money::prompt::{collect_request, ActionRequest, TerminalPrompter};
use r2money::task::{build_task, BotContext};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "R2 Money testnet bot", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chains/r2money/config.toml")]
    config: String,
    /// File holding one `PRIVATE_KEY=0x...` line per wallet
    #[arg(short, long, default_value = WalletManager::DEFAULT_KEY_FILE)]
    keys: String,
}

/// Everything resolved before the first network call.
struct Session {
    bot: BotContext,
    accounts: Vec<Account>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let log_guard = setup_logger("r2money");

    let args = Args::parse();
    let notifier = notifier_from_env();

    let session = match bootstrap(&args, notifier.clone()) {
        Ok(session) => session,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&session).await {
        error!("Fatal Error: {:#}", e);
        notifier.notify(&format!("❌ Fatal Error: {}", e)).await;
        drop(log_guard);
        std::process::exit(1);
    }
}

fn bootstrap(args: &Args, notifier: Arc<dyn Notifier>) -> Result<Session> {
    print_banner();

    info!("Loading config from: {}", args.config);
    let config = R2Config::load(&args.config)?;

    let manager = WalletManager::load(&args.keys)?;
    println!(
        "{}",
        format!(
            "Loaded {} private key(s) from {}",
            manager.count(),
            manager.source().display()
        )
        .green()
    );
    if !manager.skipped().is_empty() {
        println!(
            "{}",
            format!("Skipped {} malformed PRIVATE_KEY line(s)", manager.skipped().len()).yellow()
        );
    }
    for (i, key) in manager.keys().iter().enumerate() {
        println!("  Wallet {}: {}...", i + 1, key.preview());
    }

    let chain = config.chain();
    info!("Network: {} (chain id {})", chain.name, chain.chain_id);
    let provider = Provider::<Http>::try_from(chain.rpc_endpoint.as_str()).map_err(|_| {
        ConfigError::InvalidRpcUrl {
            url: chain.rpc_endpoint.clone(),
        }
    })?;
    let accounts = build_accounts(manager.keys(), &provider, chain.chain_id)?;
    for account in &accounts {
        println!("  Address {}: {}", account.index + 1, account);
    }
    info!("Total valid wallets: {}", accounts.len());

    Ok(Session {
        bot: BotContext::new(config, notifier),
        accounts,
    })
}

async fn run(session: &Session) -> Result<()> {
    let bot = &session.bot;
    let notifier = bot.notifier.as_ref();

    let addresses: Vec<String> = session.accounts.iter().map(|a| a.to_string()).collect();
    notifier
        .notify(&format!(
            "🚀 R2 Money bot started\nWallets: {}\n{}",
            addresses.len(),
            addresses.join("\n")
        ))
        .await;

    show_all_balances(session).await;

    let request = match collect_request(&mut TerminalPrompter::new())? {
        Some(request) => request,
        None => {
            println!("{}", "Goodbye!".yellow());
            notifier.notify("👋 Script terminated by user.").await;
            return Ok(());
        }
    };

    print_request(&request);

    let task = build_task(&request, &bot.config);
    let runner = SequentialRunner::new(request.params.iterations(), request.params.delay());

    let reports = runner
        .run(&session.accounts, notifier, |account, _| {
            let ctx = bot.task_context(&account);
            task.run(ctx)
        })
        .await;

    print_summary(&reports);
    notifier
        .notify(&format!(
            "🏁 {} completed for {} wallet(s)\n{}",
            request.kind.describe(),
            reports.len(),
            summary_lines(&reports).join("\n")
        ))
        .await;

    show_all_balances(session).await;
    Ok(())
}

async fn show_all_balances(session: &Session) {
    let bot = &session.bot;
    for account in &session.accounts {
        let ledger = bot.ledger_for(account);
        display_balances(ledger.as_ref(), &bot.config, account.address).await;
    }
}

fn print_banner() {
    println!("{}", "==============================================".cyan());
    println!("{}", "          R2 MONEY TESTNET BOT (Sepolia)      ".cyan().bold());
    println!("{}", "==============================================".cyan());
}

fn print_request(request: &ActionRequest) {
    println!("{}", request.kind.describe().bold());
    println!("  Percentage:   {}%", request.params.percentage());
    println!("  Transactions: {} per wallet", request.params.iterations());
    println!("  Delay:        {}s", request.params.delay_secs());
}

fn summary_lines(reports: &[AccountReport]) -> Vec<String> {
    reports
        .iter()
        .map(|r| format!("{}: {}/{} successful", r.account, r.succeeded, r.attempted))
        .collect()
}

fn print_summary(reports: &[AccountReport]) {
    println!("{}", "All transactions completed.".green().bold());
    for line in summary_lines(reports) {
        println!("  {}", line);
    }
}
