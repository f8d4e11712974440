//! Token symbol resolution and decimal precision lookup for Flow EVM.

use crate::error::{Result, WorkflowError};

/// Sentinel address the vault uses for native FLOW.
pub const NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Precision used for any token without an override.
pub const DEFAULT_DECIMALS: u32 = 18;

/// Tokens with a fixed address on Flow EVM mainnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownToken {
    Flow,
    Wflow,
    Usdc,
    Usdt,
}

impl KnownToken {
    pub const ALL: [KnownToken; 4] = [Self::Flow, Self::Wflow, Self::Usdc, Self::Usdt];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Flow => "FLOW",
            Self::Wflow => "WFLOW",
            Self::Usdc => "USDC",
            Self::Usdt => "USDT",
        }
    }

    pub fn address(self) -> &'static str {
        match self {
            Self::Flow => NATIVE_TOKEN_ADDRESS,
            Self::Wflow => "0xd3bF53DAC106A0290B0483EcBC89d40FcC961f3e",
            // Stargate-bridged stablecoins
            Self::Usdc => "0xF1815bd50389c46847f0Bda824eC8da914045D14",
            Self::Usdt => "0x674843C06FF83502ddb4D37c2E09C01cdA38cbc8",
        }
    }

    pub fn decimals(self) -> u32 {
        match self {
            Self::Usdc | Self::Usdt => 6,
            Self::Flow | Self::Wflow => DEFAULT_DECIMALS,
        }
    }

    /// Case-insensitive symbol lookup.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_ascii_uppercase().as_str() {
            "FLOW" => Some(Self::Flow),
            "WFLOW" => Some(Self::Wflow),
            "USDC" => Some(Self::Usdc),
            "USDT" => Some(Self::Usdt),
            _ => None,
        }
    }

    pub fn from_address(address: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|token| token.address().eq_ignore_ascii_case(address))
    }
}

/// True for `0x` followed by exactly 40 hex digits.
pub fn is_address(token: &str) -> bool {
    match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(digits) => digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Resolve a symbol or literal address to an address.
///
/// Literal addresses come back unchanged, including their checksum casing.
pub fn resolve(token: &str) -> Result<String> {
    if is_address(token) {
        return Ok(token.to_string());
    }

    KnownToken::from_symbol(token)
        .map(|known| known.address().to_string())
        .ok_or_else(|| WorkflowError::UnknownToken(token.to_string()))
}

/// Decimal precision for a symbol or address. Never fails.
pub fn decimals_of(token: &str) -> u32 {
    KnownToken::from_symbol(token)
        .or_else(|| KnownToken::from_address(token))
        .map(KnownToken::decimals)
        .unwrap_or(DEFAULT_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_native_symbol_any_case() {
        assert_eq!(resolve("FLOW").unwrap(), NATIVE_TOKEN_ADDRESS);
        assert_eq!(resolve("flow").unwrap(), NATIVE_TOKEN_ADDRESS);
        assert_eq!(resolve("Flow").unwrap(), NATIVE_TOKEN_ADDRESS);
    }

    #[test]
    fn test_resolve_address_passthrough() {
        let address = "0xabCDEF0123456789abcdef0123456789ABCDEF01";
        assert_eq!(resolve(address).unwrap(), address);
    }

    #[test]
    fn test_resolve_unknown_symbol() {
        assert_eq!(
            resolve("DOGE"),
            Err(WorkflowError::UnknownToken("DOGE".to_string()))
        );
    }

    #[test]
    fn test_resolve_rejects_malformed_address() {
        assert!(matches!(resolve("0x1234"), Err(WorkflowError::UnknownToken(_))));
        assert!(matches!(
            resolve("0xZZCDEF0123456789abcdef0123456789ABCDEF01"),
            Err(WorkflowError::UnknownToken(_))
        ));
    }

    #[test]
    fn test_known_addresses_are_well_formed() {
        for token in KnownToken::ALL {
            assert!(is_address(token.address()), "{:?}", token);
        }
    }

    #[test]
    fn test_decimals() {
        assert_eq!(decimals_of("USDC"), 6);
        assert_eq!(decimals_of("usdt"), 6);
        assert_eq!(decimals_of("FLOW"), 18);
        assert_eq!(decimals_of("DOGE"), 18);
        assert_eq!(decimals_of(&KnownToken::Usdc.address().to_lowercase()), 6);
        assert_eq!(decimals_of("0xabCDEF0123456789abcdef0123456789ABCDEF01"), 18);
    }
}
