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

use std::fmt;

use alloy_primitives::{Address, I256, U256};

use crate::{abi::ParamType, error::EncodingError, hex::encode_data};

/// A contract parameter value.
///
/// `fixedMxN` and `ufixedMxN` values are carried as their integer representation scaled
/// by `10^N`, in [AbiValue::Int] and [AbiValue::Uint] respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Bool(bool),
    Uint(U256),
    Int(I256),
    String(String),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Array(Vec<AbiValue>),
    FixedArray(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiValue::String(_) | AbiValue::Bytes(_) | AbiValue::Array(_) => true,
            AbiValue::FixedArray(items) | AbiValue::Tuple(items) => {
                items.iter().any(AbiValue::is_dynamic)
            }
            _ => false,
        }
    }

    /// Number of bytes the value occupies in the head of its enclosing block.
    pub fn head_size(&self) -> usize {
        match self {
            _ if self.is_dynamic() => 32,
            AbiValue::FixedArray(items) | AbiValue::Tuple(items) => {
                items.iter().map(AbiValue::head_size).sum()
            }
            _ => 32,
        }
    }

    /// Verifies that the value can be encoded as `kind`.
    pub fn type_check(&self, kind: &ParamType) -> Result<(), EncodingError> {
        match (self, kind) {
            (AbiValue::Address(_), ParamType::Address)
            | (AbiValue::Bool(_), ParamType::Bool)
            | (AbiValue::String(_), ParamType::String)
            | (AbiValue::Bytes(_), ParamType::Bytes) => Ok(()),
            (AbiValue::Uint(value), ParamType::Uint(bits) | ParamType::Ufixed(bits, _)) => {
                if value.bit_len() <= *bits {
                    Ok(())
                } else {
                    Err(EncodingError::IntegerOverflow(kind.to_string()))
                }
            }
            (AbiValue::Int(value), ParamType::Int(bits) | ParamType::Fixed(bits, _)) => {
                if fits_signed(value, *bits) {
                    Ok(())
                } else {
                    Err(EncodingError::IntegerOverflow(kind.to_string()))
                }
            }
            (AbiValue::FixedBytes(bytes), ParamType::FixedBytes(len)) => {
                check_length(kind, *len, bytes.len())
            }
            (AbiValue::Array(items), ParamType::Array(inner)) => {
                items.iter().try_for_each(|item| item.type_check(inner))
            }
            (AbiValue::FixedArray(items), ParamType::FixedArray(inner, len)) => {
                check_length(kind, *len, items.len())?;
                items.iter().try_for_each(|item| item.type_check(inner))
            }
            (AbiValue::Tuple(items), ParamType::Tuple(kinds)) => {
                check_length(kind, kinds.len(), items.len())?;
                items
                    .iter()
                    .zip(kinds)
                    .try_for_each(|(item, kind)| item.type_check(kind))
            }
            _ => Err(EncodingError::TypeMismatch(kind.to_string())),
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<I256> {
        match self {
            AbiValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::Bytes(value) | AbiValue::FixedBytes(value) => Some(value),
            _ => None,
        }
    }
}

/// Whether `value` lies in `[-2^(bits-1), 2^(bits-1))`.
pub(crate) fn fits_signed(value: &I256, bits: usize) -> bool {
    let magnitude = if value.is_negative() {
        (!*value).into_raw()
    } else {
        value.into_raw()
    };
    magnitude.bit_len() < bits
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    items: &[AbiValue],
    open: &str,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

fn check_length(kind: &ParamType, expected: usize, actual: usize) -> Result<(), EncodingError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EncodingError::InvalidLength {
            kind: kind.to_string(),
            expected,
            actual,
        })
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Address(address) => f.write_str(&encode_data(address)),
            AbiValue::Bool(value) => write!(f, "{value}"),
            AbiValue::Uint(value) => write!(f, "{value}"),
            AbiValue::Int(value) => write!(f, "{value}"),
            AbiValue::String(value) => write!(f, "{value:?}"),
            AbiValue::Bytes(value) | AbiValue::FixedBytes(value) => {
                f.write_str(&encode_data(value))
            }
            AbiValue::Array(items) | AbiValue::FixedArray(items) => write_list(f, items, "[", "]"),
            AbiValue::Tuple(items) => write_list(f, items, "(", ")"),
        }
    }
}

impl From<Address> for AbiValue {
    fn from(value: Address) -> Self {
        AbiValue::Address(value)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }
}

impl From<I256> for AbiValue {
    fn from(value: I256) -> Self {
        AbiValue::Int(value)
    }
}

impl From<&str> for AbiValue {
    fn from(value: &str) -> Self {
        AbiValue::String(value.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(value: String) -> Self {
        AbiValue::String(value)
    }
}
