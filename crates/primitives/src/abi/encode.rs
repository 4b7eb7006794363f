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

use alloy_primitives::U256;
use log::trace;

use crate::{
    abi::{validate_method_name, AbiValue, ParamType},
    error::EncodingError,
    keccak::selector,
};

/// Encodes `values` as one parameter block.
///
/// The values are not checked against any declared type; use [encode_call] or
/// [AbiValue::type_check] for that.
pub fn encode(values: &[AbiValue]) -> Vec<u8> {
    let values: Vec<&AbiValue> = values.iter().collect();
    let mut out = Vec::new();
    encode_sequence(&values, &mut out);
    out
}

/// Encodes a call of the method `name` with the given typed arguments: the 4-byte selector
/// of `name(type1,...,typeN)` followed by the encoded arguments.
pub fn encode_call(name: &str, args: &[(ParamType, AbiValue)]) -> Result<Vec<u8>, EncodingError> {
    validate_method_name(name)?;
    for (kind, value) in args {
        value.type_check(kind)?;
    }
    let types: Vec<String> = args.iter().map(|(kind, _)| kind.to_string()).collect();
    let signature = format!("{name}({})", types.join(","));
    trace!("encoding call {signature}");

    let values: Vec<&AbiValue> = args.iter().map(|(_, value)| value).collect();
    let mut out = selector(&signature).to_vec();
    encode_sequence(&values, &mut out);
    Ok(out)
}

fn encode_sequence(values: &[&AbiValue], out: &mut Vec<u8>) {
    let head_size: usize = values.iter().map(|value| value.head_size()).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();
    for value in values {
        if value.is_dynamic() {
            head.extend_from_slice(&word(U256::from(head_size + tail.len())));
            encode_value(value, &mut tail);
        } else {
            encode_value(value, &mut head);
        }
    }
    debug_assert_eq!(head.len(), head_size);
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
}

fn encode_value(value: &AbiValue, out: &mut Vec<u8>) {
    match value {
        AbiValue::Address(address) => {
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(address.as_slice());
        }
        AbiValue::Bool(value) => out.extend_from_slice(&word(U256::from(*value as u8))),
        AbiValue::Uint(value) => out.extend_from_slice(&word(*value)),
        // two's complement sign-extends negative values with 0xff
        AbiValue::Int(value) => out.extend_from_slice(&word(value.into_raw())),
        AbiValue::String(value) => encode_bytes(value.as_bytes(), out),
        AbiValue::Bytes(value) => encode_bytes(value, out),
        AbiValue::FixedBytes(value) => {
            out.extend_from_slice(value);
            pad_right(out, value.len());
        }
        AbiValue::Array(items) => {
            out.extend_from_slice(&word(U256::from(items.len())));
            let items: Vec<&AbiValue> = items.iter().collect();
            encode_sequence(&items, out);
        }
        AbiValue::FixedArray(items) | AbiValue::Tuple(items) => {
            let items: Vec<&AbiValue> = items.iter().collect();
            encode_sequence(&items, out);
        }
    }
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&word(U256::from(bytes.len())));
    out.extend_from_slice(bytes);
    pad_right(out, bytes.len());
}

fn pad_right(out: &mut Vec<u8>, len: usize) {
    let padding = (32 - len % 32) % 32;
    out.resize(out.len() + padding, 0);
}

fn word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}
