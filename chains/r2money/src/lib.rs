pub mod account;
pub mod balances;
pub mod bot;
pub mod config;
pub mod contracts;
pub mod prompt;
pub mod task;
pub mod token;
pub mod utils;
pub mod venue;
