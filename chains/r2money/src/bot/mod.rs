pub mod notification;

pub use notification::{notifier_from_env, TelegramConfig, TelegramNotifier};
