// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The JSON-RPC hex conventions.
//!
//! Quantities are `0x`-prefixed lowercase hex without leading zeros (`0x0` for zero).
//! Data keeps every byte, so its hex form always has an even number of digits.

use alloy_primitives::U256;

use crate::error::DecodeError;

/// Returns `value` with exactly one `0x` prefix.
pub fn add_hex_prefix(value: &str) -> String {
    format!("0x{}", remove_hex_prefix(value))
}

/// Returns `value` without its `0x` or `0X` prefix, if any.
pub fn remove_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Encodes a quantity, e.g. `0x0`, `0x400`.
pub fn encode_quantity(value: U256) -> String {
    let bytes = value.to_be_bytes::<32>();
    let digits = alloy_primitives::hex::encode(bytes);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}

/// Decodes a quantity. The prefix is optional; at least one digit is required.
pub fn decode_quantity(value: &str) -> Result<U256, DecodeError> {
    let digits = remove_hex_prefix(value.trim());
    if digits.is_empty() {
        return Err(DecodeError::InvalidInteger);
    }
    U256::from_str_radix(digits, 16).map_err(|_| DecodeError::InvalidInteger)
}

/// Decodes a quantity that must fit into a `u64`.
pub fn decode_quantity_u64(value: &str) -> Result<u64, DecodeError> {
    let quantity = decode_quantity(value)?;
    u64::try_from(quantity).map_err(|_| DecodeError::InvalidInteger)
}

/// Encodes unformatted data, preserving leading zero bytes.
pub fn encode_data(data: impl AsRef<[u8]>) -> String {
    alloy_primitives::hex::encode_prefixed(data)
}

/// Decodes unformatted data. The prefix is optional.
pub fn decode_data(value: &str) -> Result<Vec<u8>, DecodeError> {
    alloy_primitives::hex::decode(remove_hex_prefix(value.trim()))
        .map_err(|_| DecodeError::InvalidHex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_idempotent() {
        assert_eq!(add_hex_prefix("ab"), "0xab");
        assert_eq!(add_hex_prefix("0xab"), "0xab");
        assert_eq!(add_hex_prefix(&add_hex_prefix("ab")), "0xab");
        assert_eq!(remove_hex_prefix("0xab"), "ab");
        assert_eq!(remove_hex_prefix("0Xab"), "ab");
        assert_eq!(remove_hex_prefix(remove_hex_prefix("0xab")), "ab");
    }

    #[test]
    fn quantities() {
        assert_eq!(encode_quantity(U256::ZERO), "0x0");
        assert_eq!(encode_quantity(U256::from(1024)), "0x400");
        assert_eq!(encode_quantity(U256::MAX), format!("0x{}", "f".repeat(64)));

        assert_eq!(decode_quantity("0x400").unwrap(), U256::from(1024));
        assert_eq!(decode_quantity("0x0").unwrap(), U256::ZERO);
        assert_eq!(decode_quantity_u64("0x5208").unwrap(), 21000);
        assert!(matches!(decode_quantity("0x"), Err(DecodeError::InvalidInteger)));
        assert!(matches!(decode_quantity("0xzz"), Err(DecodeError::InvalidInteger)));
        assert!(matches!(
            decode_quantity_u64("0x10000000000000000"),
            Err(DecodeError::InvalidInteger)
        ));
    }

    #[test]
    fn data_keeps_leading_zeros() {
        assert_eq!(encode_data([0x00u8, 0x01]), "0x0001");
        assert_eq!(encode_data(b""), "0x");
        assert_eq!(decode_data("0x0001").unwrap(), vec![0x00, 0x01]);
        assert_eq!(decode_data("0x").unwrap(), Vec::<u8>::new());
        assert!(matches!(decode_data("0x123"), Err(DecodeError::InvalidHex)));
    }
}
