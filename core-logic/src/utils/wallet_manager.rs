use crate::error::{ConfigError, CoreError, WalletError};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

const KEY_PREFIX: &str = "PRIVATE_KEY=";
const KEY_HEX_LEN: usize = 64;

/// A validated `0x`-prefixed secp256k1 secret, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Accepts exactly `0x` followed by 64 hex characters.
    pub fn parse(raw: &str) -> Result<Self, WalletError> {
        let hex = raw
            .strip_prefix("0x")
            .ok_or(WalletError::InvalidKeyFormat)?;
        if hex.len() != KEY_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WalletError::InvalidKeyFormat);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 8 characters, safe to print.
    pub fn preview(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}...***REDACTED***)", self.preview())
    }
}

/// A `PRIVATE_KEY=` line that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub preview: String,
}

#[derive(Debug, Default)]
pub struct KeyScan {
    pub keys: Vec<PrivateKey>,
    pub skipped: Vec<SkippedLine>,
}

/// Extracts every valid `PRIVATE_KEY=0x...` entry in file order.
///
/// Lines without the prefix are ignored silently; prefixed lines with a
/// malformed payload are reported in [`KeyScan::skipped`]. Duplicates are kept.
pub fn parse_key_lines(content: &str) -> KeyScan {
    let mut scan = KeyScan::default();

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        let Some(value) = trimmed.strip_prefix(KEY_PREFIX) else {
            continue;
        };

        match PrivateKey::parse(value) {
            Ok(key) => scan.keys.push(key),
            Err(_) => scan.skipped.push(SkippedLine {
                line_no: idx + 1,
                preview: trimmed.chars().take(20).collect(),
            }),
        }
    }

    scan
}

/// Loads signing keys from a dotenv-style file.
pub struct WalletManager {
    source: PathBuf,
    keys: Vec<PrivateKey>,
    skipped: Vec<SkippedLine>,
}

impl WalletManager {
    pub const DEFAULT_KEY_FILE: &'static str = ".env";

    /// Reads `path` and keeps every valid key.
    ///
    /// Fails when the file is unreadable or holds no valid key at all.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: shown.clone(),
            },
            _ => ConfigError::IoError {
                path: shown.clone(),
                msg: e.to_string(),
            },
        })?;

        let scan = parse_key_lines(&content);
        for skipped in &scan.skipped {
            warn!(
                "Skipping invalid private key on line {}: {}... (must be 0x + 64 hex chars)",
                skipped.line_no, skipped.preview
            );
        }

        if scan.keys.is_empty() {
            return Err(WalletError::NoValidKeys { path: shown }.into());
        }

        info!("Detected {} private key(s) in {}", scan.keys.len(), shown);

        Ok(Self {
            source: path.to_path_buf(),
            keys: scan.keys,
            skipped: scan.skipped,
        })
    }

    /// Returns the number of available keys
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[PrivateKey] {
        &self.keys
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}
