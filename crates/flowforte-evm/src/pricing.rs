//! Minimum-output computation in 18-decimal fixed point.

use ethers::types::U256;
use flowforte_workflow::{Slippage, Wad};

use crate::error::{EncodeError, Result};

/// `floor(amount_in * price * (1 - slippage))`, all in integer arithmetic.
///
/// `price` is output units per input unit.
pub fn min_amount_out(amount_in: U256, price: Wad, slippage: Slippage) -> Result<U256> {
    let one = Wad::one().raw();

    let expected_out = amount_in
        .checked_mul(price.raw())
        .ok_or(EncodeError::Overflow("expected output"))?
        / one;

    // Slippage is below one by construction.
    let retained = one - slippage.as_wad().raw();

    Ok(expected_out
        .checked_mul(retained)
        .ok_or(EncodeError::Overflow("minimum output"))?
        / one)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wad(value: &str) -> Wad {
        value.parse().unwrap()
    }

    fn slippage(value: &str) -> Slippage {
        value.parse().unwrap()
    }

    #[test]
    fn test_min_amount_out_reference_case() {
        let out = min_amount_out(U256::from(100u64), wad("2.0"), slippage("0.01")).unwrap();
        assert_eq!(out, U256::from(198u64));
    }

    #[test]
    fn test_min_amount_out_floors() {
        // 7 * 0.3 = 2.1 -> 2, then 2 * 0.97 = 1.94 -> 1
        let out = min_amount_out(U256::from(7u64), wad("0.3"), slippage("0.03")).unwrap();
        assert_eq!(out, U256::from(1u64));
    }

    #[test]
    fn test_min_amount_out_base_units() {
        // 50 FLOW at 0.75 USDC-wei per FLOW-wei with 0.5% slippage
        let amount_in = U256::exp10(18) * U256::from(50u64);
        let out = min_amount_out(amount_in, wad("0.75"), slippage("0.005")).unwrap();
        assert_eq!(out, U256::from_dec_str("37312500000000000000").unwrap());
    }

    #[test]
    fn test_zero_slippage_and_zero_amount() {
        assert_eq!(
            min_amount_out(U256::from(1_000u64), wad("1.5"), slippage("0")).unwrap(),
            U256::from(1_500u64)
        );
        assert_eq!(
            min_amount_out(U256::zero(), wad("3"), slippage("0.5")).unwrap(),
            U256::zero()
        );
    }

    #[test]
    fn test_overflow_reported() {
        assert_eq!(
            min_amount_out(U256::MAX, wad("2"), slippage("0.01")),
            Err(EncodeError::Overflow("expected output"))
        );
    }
}
