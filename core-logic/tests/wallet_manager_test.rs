use core_logic::{ConfigError, CoreError, WalletError, WalletManager};
use std::io::Write;
use tempfile::NamedTempFile;

const KEY_A: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
const KEY_B: &str = "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

fn env_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_counts_only_valid_keys() {
    let file = env_file(&format!(
        "PRIVATE_KEY={}\nPRIVATE_KEY=0xdeadbeef\nRPC=foo\nPRIVATE_KEY={}\n",
        KEY_A, KEY_B
    ));

    let manager = WalletManager::load(file.path()).unwrap();

    assert_eq!(manager.count(), 2);
    assert_eq!(manager.keys()[0].expose(), KEY_A);
    assert_eq!(manager.keys()[1].expose(), KEY_B);
    assert_eq!(manager.skipped().len(), 1);
    assert_eq!(manager.source(), file.path());
}

#[test]
fn test_load_without_valid_keys_fails() {
    let file = env_file("PRIVATE_KEY=0x12\n# nothing else\n");

    let err = WalletManager::load(file.path()).err().unwrap();
    assert!(matches!(
        err,
        CoreError::Wallet(WalletError::NoValidKeys { .. })
    ));
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.env");

    let err = WalletManager::load(&missing).err().unwrap();
    assert!(matches!(
        err,
        CoreError::Config(ConfigError::FileNotFound { .. })
    ));
}
