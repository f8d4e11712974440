//! Hex helpers.

use ethers::types::Address;

use crate::error::{EncodeError, Result};

/// Decode a hex string, with or without a `0x` prefix, into bytes.
pub fn to_byte_array(hex_string: &str) -> Result<Vec<u8>> {
    let digits = hex_string
        .strip_prefix("0x")
        .or_else(|| hex_string.strip_prefix("0X"))
        .unwrap_or(hex_string);

    if digits.len() % 2 != 0 {
        return Err(EncodeError::InvalidHex {
            input: hex_string.to_string(),
            reason: "odd number of digits".to_string(),
        });
    }

    hex::decode(digits).map_err(|e| EncodeError::InvalidHex {
        input: hex_string.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a 20-byte EVM address.
pub fn parse_address(value: &str) -> Result<Address> {
    let bytes = to_byte_array(value).map_err(|_| EncodeError::InvalidAddress(value.to_string()))?;
    if bytes.len() != Address::len_bytes() {
        return Err(EncodeError::InvalidAddress(value.to_string()));
    }
    Ok(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_byte_array_prefix_optional() {
        assert_eq!(to_byte_array("0x0aff10").unwrap(), vec![0x0a, 0xff, 0x10]);
        assert_eq!(to_byte_array("0aFF10").unwrap(), vec![0x0a, 0xff, 0x10]);
        assert_eq!(to_byte_array("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_to_byte_array_rejects_malformed() {
        assert!(matches!(to_byte_array("0xabc"), Err(EncodeError::InvalidHex { .. })));
        assert!(matches!(to_byte_array("zz"), Err(EncodeError::InvalidHex { .. })));
        assert!(matches!(to_byte_array("0x0g"), Err(EncodeError::InvalidHex { .. })));
    }

    #[test]
    fn test_parse_address() {
        let address = parse_address("0xd3bF53DAC106A0290B0483EcBC89d40FcC961f3e").unwrap();
        assert_eq!(address.as_bytes()[0], 0xd3);
        assert_eq!(
            parse_address("0x1234"),
            Err(EncodeError::InvalidAddress("0x1234".to_string()))
        );
    }
}
