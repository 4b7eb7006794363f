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

use std::str::FromStr;

use alloy_primitives::{Address, Sign, I256, U256};

use crate::{
    abi::{split_top_level, AbiValue, ParamType},
    error::EncodingError,
    hex::decode_data,
    units::parse_decimal,
};

/// Parses the textual form of a value of type `kind`.
///
/// Integers are decimal or `0x` hex, `fixed` values are decimal numbers, byte strings are
/// hex, arrays are written as `[a,b]` and tuples as `(a,b)`. Strings may be quoted. The
/// result is checked against `kind`.
pub fn parse_value(kind: &ParamType, input: &str) -> Result<AbiValue, EncodingError> {
    let value = parse(kind, input.trim())?;
    value.type_check(kind)?;
    Ok(value)
}

fn parse(kind: &ParamType, input: &str) -> Result<AbiValue, EncodingError> {
    let invalid = || EncodingError::InvalidArgument {
        kind: kind.to_string(),
        input: input.to_string(),
    };

    let value = match kind {
        ParamType::Address => AbiValue::Address(Address::from_str(input).map_err(|_| invalid())?),
        ParamType::Bool => match input {
            "true" | "1" => AbiValue::Bool(true),
            "false" | "0" => AbiValue::Bool(false),
            _ => return Err(invalid()),
        },
        ParamType::Uint(_) => AbiValue::Uint(U256::from_str(input).map_err(|_| invalid())?),
        ParamType::Int(_) => AbiValue::Int(I256::from_str(input).map_err(|_| invalid())?),
        ParamType::Ufixed(_, decimals) => {
            AbiValue::Uint(parse_decimal(input, *decimals).map_err(|_| invalid())?)
        }
        ParamType::Fixed(_, decimals) => {
            let (sign, magnitude) = match input.strip_prefix('-') {
                Some(magnitude) => (Sign::Negative, magnitude),
                None => (Sign::Positive, input),
            };
            let magnitude = parse_decimal(magnitude, *decimals).map_err(|_| invalid())?;
            // the sign is applied to the unsigned magnitude so that -2^255 is reachable
            let value = I256::checked_from_sign_and_abs(sign, magnitude).ok_or_else(invalid)?;
            AbiValue::Int(value)
        }
        ParamType::String => {
            let unquoted = input
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(input);
            AbiValue::String(unquoted.to_string())
        }
        ParamType::Bytes => AbiValue::Bytes(decode_data(input).map_err(|_| invalid())?),
        ParamType::FixedBytes(_) => AbiValue::FixedBytes(decode_data(input).map_err(|_| invalid())?),
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => {
            let items = input
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .and_then(split_top_level)
                .ok_or_else(invalid)?
                .into_iter()
                .map(|item| parse(inner, item.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            if matches!(kind, ParamType::Array(_)) {
                AbiValue::Array(items)
            } else {
                AbiValue::FixedArray(items)
            }
        }
        ParamType::Tuple(kinds) => {
            let items = input
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .and_then(split_top_level)
                .ok_or_else(invalid)?;
            if items.len() != kinds.len() {
                return Err(EncodingError::InvalidLength {
                    kind: kind.to_string(),
                    expected: kinds.len(),
                    actual: items.len(),
                });
            }
            let items = kinds
                .iter()
                .zip(items)
                .map(|(kind, item)| parse(kind, item.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            AbiValue::Tuple(items)
        }
    };
    Ok(value)
}
