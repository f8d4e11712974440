//! `swapExactInputSingle` calldata encoding.

use ethers::abi::{parse_abi, Function, Token};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EncodeError, Result};

/// Human-readable ABI of the vault's swap entry point.
pub const SWAP_SIGNATURE: &str = "function swapExactInputSingle(address tokenIn, address tokenOut, uint256 amountIn, uint256 amountOutMinimum, address feeRecipient, uint256 feeRate) external returns (uint256)";

const SWAP_FUNCTION: &str = "swapExactInputSingle";

/// Size of an ABI word.
const WORD: usize = 32;

pub type Selector = [u8; 4];

/// Arguments of a single-hop exact-input swap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCall {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// Zero address when no fee is taken.
    pub fee_recipient: Address,
    /// Fee in millionths of the output.
    pub fee_rate: U256,
}

impl SwapCall {
    /// Swap without a protocol fee.
    pub fn new(token_in: Address, token_out: Address, amount_in: U256, amount_out_minimum: U256) -> Self {
        Self {
            token_in,
            token_out,
            amount_in,
            amount_out_minimum,
            fee_recipient: Address::zero(),
            fee_rate: U256::zero(),
        }
    }

    pub fn with_fee(mut self, fee_recipient: Address, fee_rate: U256) -> Self {
        self.fee_recipient = fee_recipient;
        self.fee_rate = fee_rate;
        self
    }

    fn tokens(&self) -> [Token; 6] {
        [
            Token::Address(self.token_in),
            Token::Address(self.token_out),
            Token::Uint(self.amount_in),
            Token::Uint(self.amount_out_minimum),
            Token::Address(self.fee_recipient),
            Token::Uint(self.fee_rate),
        ]
    }
}

/// Calldata for one swap invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    pub selector: Selector,
    /// Complete calldata, selector included.
    pub payload: Vec<u8>,
}

impl EncodedCall {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.payload))
    }

    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// Encoder bound to the swap function ABI.
#[derive(Debug, Clone)]
pub struct SwapCallEncoder {
    function: Function,
}

impl SwapCallEncoder {
    pub fn new() -> Result<Self> {
        let abi = parse_abi(&[SWAP_SIGNATURE]).map_err(|e| EncodeError::Abi(e.to_string()))?;
        let function = abi
            .function(SWAP_FUNCTION)
            .map_err(|e| EncodeError::Abi(e.to_string()))?
            .clone();

        Ok(Self { function })
    }

    pub fn encode(&self, call: &SwapCall) -> Result<EncodedCall> {
        let payload = self
            .function
            .encode_input(&call.tokens())
            .map_err(|e| EncodeError::Abi(e.to_string()))?;

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&payload[..4]);

        debug!(
            selector = %hex::encode(selector),
            len = payload.len(),
            "encoded swap call"
        );
        Ok(EncodedCall { selector, payload })
    }

    /// Leading four bytes of a call with all-default arguments.
    pub fn selector(&self) -> Result<Selector> {
        self.encode(&SwapCall::default()).map(|call| call.selector)
    }

    /// Calldata as raw bytes, ready to be passed as a Cadence `[UInt8]`.
    pub fn encode_for_cadence(&self, call: &SwapCall) -> Result<Vec<u8>> {
        self.encode(call).map(|call| call.payload)
    }

    /// Decode the `uint256 amountOut` returned by the vault.
    pub fn decode_return(&self, data: &[u8]) -> Result<U256> {
        if data.len() != WORD {
            return Err(EncodeError::Decode(format!(
                "expected {WORD} bytes, got {}",
                data.len()
            )));
        }

        let tokens = self
            .function
            .decode_output(data)
            .map_err(|e| EncodeError::Decode(e.to_string()))?;

        tokens
            .into_iter()
            .next()
            .and_then(Token::into_uint)
            .ok_or_else(|| EncodeError::Decode("return value is not a uint256".to_string()))
    }

    pub fn decode_return_hex(&self, data: &str) -> Result<U256> {
        let bytes = crate::bytes::to_byte_array(data)?;
        self.decode_return(&bytes)
    }
}
