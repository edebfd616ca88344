//! # Core Logic - Shared Utilities for the Testnet Bots
//!
//! This crate provides the chain-agnostic pieces used by every bot in the
//! workspace: key loading, run parameters, logging and the sequential runner.
//!
//! ## Modules
//!
//! - [`config`] - Run parameters and chain endpoint settings
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions (`Task`, `Notifier`)
//! - [`utils`] - Utility modules (key loader, logger, runner)

// Module declarations - internal modules marked pub(crate)
pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

// Selective exports - only public API types
pub use config::{ChainConfig, RunParameters};
pub use error::{ConfigError, CoreError, NetworkError, WalletError};
pub use traits::{Notifier, SilentNotifier, Task, TaskResult};

// Utils are pub(crate) - only export specific public utilities
pub use utils::runner::{AccountReport, SequentialRunner};
pub use utils::wallet_manager::{parse_key_lines, KeyScan, PrivateKey, SkippedLine};
pub use utils::{setup_logger, WalletManager};
