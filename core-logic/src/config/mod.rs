use crate::error::ConfigError;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Endpoint settings shared by every chain crate.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
    pub explorer_url: String,
}

impl ChainConfig {
    /// Block explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

/// Operator-chosen sizing and pacing for a run.
///
/// Construct through [`RunParameters::new`]; the fields are always within
/// their accepted ranges once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParameters {
    percentage: u32,
    iterations: u32,
    delay_secs: u64,
}

impl RunParameters {
    pub const PERCENTAGE_RANGE: RangeInclusive<u32> = 5..=100;
    pub const ITERATION_RANGE: RangeInclusive<u32> = 1..=100;
    pub const DELAY_RANGE: RangeInclusive<u64> = 5..=100;

    pub fn new(percentage: u32, iterations: u32, delay_secs: u64) -> Result<Self, ConfigError> {
        check_range("percentage", percentage as u64, &Self::PERCENTAGE_RANGE)?;
        check_range("iterations", iterations as u64, &Self::ITERATION_RANGE)?;
        check_range("delay_secs", delay_secs, &Self::DELAY_RANGE)?;

        Ok(Self {
            percentage,
            iterations,
            delay_secs,
        })
    }

    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

fn check_range<T>(field: &str, value: u64, range: &RangeInclusive<T>) -> Result<(), ConfigError>
where
    T: Copy + Into<u64>,
{
    let (min, max) = ((*range.start()).into(), (*range.end()).into());
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        });
    }
    Ok(())
}
