//! Errors raised while building or decoding EVM call data.

/// EVM encoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Odd length or non-hex characters.
    #[error("invalid hex string `{input}`: {reason}")]
    InvalidHex { input: String, reason: String },

    /// Not exactly 20 bytes.
    #[error("invalid address `{0}`")]
    InvalidAddress(String),

    /// Return data of the wrong shape.
    #[error("failed to decode return data: {0}")]
    Decode(String),

    /// ABI parsing or token encoding failed.
    #[error("ABI error: {0}")]
    Abi(String),

    /// U256 overflow in fixed-point math.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, EncodeError>;
