//! Integer amount math on 256-bit token quantities.
//!
//! Products are widened to 512 bits before dividing, so no intermediate
//! value can overflow.

use ethers::types::{U256, U512};
use ethers::utils::format_units;

pub const BPS_DENOMINATOR: u32 = 10_000;

fn mul_div(value: U256, numerator: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::zero();
    }
    let wide = value.full_mul(numerator) / U512::from(denominator);
    U256::try_from(wide).unwrap_or(U256::MAX)
}

/// `balance * percentage / 100`, rounded down.
pub fn percent_of(balance: U256, percentage: u32) -> U256 {
    mul_div(balance, U256::from(percentage), U256::from(100u32))
}

/// Minimum acceptable result for `estimate` under a basis-point tolerance.
pub fn apply_slippage(estimate: U256, slippage_bps: u32) -> U256 {
    let keep = BPS_DENOMINATOR.saturating_sub(slippage_bps);
    mul_div(estimate, U256::from(keep), U256::from(BPS_DENOMINATOR))
}

/// `reserve * burn / supply`, or `None` for an empty pool.
pub fn proportional_share(reserve: U256, burn: U256, supply: U256) -> Option<U256> {
    if supply.is_zero() {
        None
    } else {
        Some(mul_div(reserve, burn, supply))
    }
}

/// Human-readable amount with the token's full decimal precision.
pub fn format_amount(value: U256, decimals: u8) -> String {
    format_units(value, decimals as u32).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::utils::parse_units;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(U256::from(1000), 10), U256::from(100));
        assert_eq!(percent_of(U256::from(1000), 100), U256::from(1000));
        // rounds down
        assert_eq!(percent_of(U256::from(19), 5), U256::zero());
    }

    #[test]
    fn test_percent_of_does_not_overflow() {
        assert_eq!(percent_of(U256::MAX, 100), U256::MAX);
        assert_eq!(percent_of(U256::MAX, 50), U256::MAX / 2);
    }

    #[test]
    fn test_apply_slippage() {
        assert_eq!(apply_slippage(U256::from(200), 50), U256::from(199));
        assert_eq!(apply_slippage(U256::from(10_000), 500), U256::from(9_500));
        assert_eq!(apply_slippage(U256::zero(), 50), U256::zero());
        assert_eq!(apply_slippage(U256::from(100), 20_000), U256::zero());
    }

    #[test]
    fn test_proportional_share() {
        assert_eq!(
            proportional_share(U256::from(5000), U256::from(25), U256::from(100)),
            Some(U256::from(1250))
        );
        assert_eq!(
            proportional_share(U256::from(5000), U256::from(25), U256::zero()),
            None
        );
    }

    #[test]
    fn test_format_amount() {
        let one_and_half: U256 = parse_units("1.5", 6).unwrap().into();
        assert_eq!(format_amount(one_and_half, 6), "1.500000");
        assert_eq!(format_amount(U256::zero(), 18), "0.000000000000000000");
    }
}
