//! FlowForte EVM Call Encoding
//!
//! Builds the calldata the Cadence scheduler hands to a `PersonalVault` on
//! Flow EVM when it executes a swap, and decodes what the vault returns.

pub mod bytes;
pub mod encoder;
pub mod error;
pub mod pricing;

pub use bytes::{parse_address, to_byte_array};
pub use encoder::{EncodedCall, Selector, SwapCall, SwapCallEncoder, SWAP_SIGNATURE};
pub use error::{EncodeError, Result};
pub use pricing::min_amount_out;
