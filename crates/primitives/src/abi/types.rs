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

use std::{fmt, str::FromStr};

use crate::{abi::split_top_level, error::EncodingError};

/// The type of a contract parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Bool,
    /// `uintN` with `N` bits.
    Uint(usize),
    /// `intN` with `N` bits.
    Int(usize),
    /// `fixedMxN`: `M` bits with `N` decimals.
    Fixed(usize, usize),
    /// `ufixedMxN`: `M` bits with `N` decimals.
    Ufixed(usize, usize),
    String,
    Bytes,
    /// `bytesN` with `1 <= N <= 32`.
    FixedBytes(usize),
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[N]` with `N > 0`.
    FixedArray(Box<ParamType>, usize),
    /// `(T1,...,Tn)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Returns whether values of this type are encoded in the tail of their enclosing block.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::String | ParamType::Bytes | ParamType::Array(_) => true,
            ParamType::FixedArray(kind, _) => kind.is_dynamic(),
            ParamType::Tuple(kinds) => kinds.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes a value of this type occupies in the head of its enclosing block.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }
        match self {
            ParamType::FixedArray(kind, len) => kind.head_size() * len,
            ParamType::Tuple(kinds) => kinds.iter().map(ParamType::head_size).sum(),
            _ => 32,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Int(bits) => write!(f, "int{bits}"),
            ParamType::Fixed(bits, decimals) => write!(f, "fixed{bits}x{decimals}"),
            ParamType::Ufixed(bits, decimals) => write!(f, "ufixed{bits}x{decimals}"),
            ParamType::String => f.write_str("string"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(len) => write!(f, "bytes{len}"),
            ParamType::Array(kind) => write!(f, "{kind}[]"),
            ParamType::FixedArray(kind, len) => write!(f, "{kind}[{len}]"),
            ParamType::Tuple(kinds) => {
                f.write_str("(")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{kind}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s.trim()).ok_or_else(|| EncodingError::InvalidType(s.to_string()))
    }
}

fn parse_type(s: &str) -> Option<ParamType> {
    if let Some(rest) = s.strip_suffix(']') {
        let open = rest.rfind('[')?;
        let kind = Box::new(parse_type(rest[..open].trim())?);
        let len = &rest[open + 1..];
        if len.is_empty() {
            return Some(ParamType::Array(kind));
        }
        return match len.parse::<usize>().ok()? {
            0 => None,
            len => Some(ParamType::FixedArray(kind, len)),
        };
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        let kinds = split_top_level(inner)?
            .into_iter()
            .map(|part| parse_type(part.trim()))
            .collect::<Option<Vec<_>>>()?;
        return Some(ParamType::Tuple(kinds));
    }

    match s {
        "address" => return Some(ParamType::Address),
        "bool" => return Some(ParamType::Bool),
        "string" => return Some(ParamType::String),
        "bytes" => return Some(ParamType::Bytes),
        "uint" => return Some(ParamType::Uint(256)),
        "int" => return Some(ParamType::Int(256)),
        "fixed" => return Some(ParamType::Fixed(128, 18)),
        "ufixed" => return Some(ParamType::Ufixed(128, 18)),
        _ => {}
    }
    if let Some(bits) = s.strip_prefix("uint") {
        return parse_bits(bits).map(ParamType::Uint);
    }
    if let Some(bits) = s.strip_prefix("int") {
        return parse_bits(bits).map(ParamType::Int);
    }
    if let Some(len) = s.strip_prefix("bytes") {
        return match parse_digits(len)? {
            len @ 1..=32 => Some(ParamType::FixedBytes(len)),
            _ => None,
        };
    }
    if let Some(suffix) = s.strip_prefix("ufixed") {
        let (bits, decimals) = parse_fixed(suffix)?;
        return Some(ParamType::Ufixed(bits, decimals));
    }
    if let Some(suffix) = s.strip_prefix("fixed") {
        let (bits, decimals) = parse_fixed(suffix)?;
        return Some(ParamType::Fixed(bits, decimals));
    }
    None
}

fn parse_digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_bits(s: &str) -> Option<usize> {
    match parse_digits(s)? {
        bits @ 8..=256 if bits % 8 == 0 => Some(bits),
        _ => None,
    }
}

fn parse_fixed(s: &str) -> Option<(usize, usize)> {
    let (bits, decimals) = s.split_once('x')?;
    let decimals = parse_digits(decimals).filter(|&d| d <= 80)?;
    Some((parse_bits(bits)?, decimals))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("address", "address")]
    #[case("uint", "uint256")]
    #[case("int", "int256")]
    #[case("uint8", "uint8")]
    #[case("bytes32", "bytes32")]
    #[case("fixed", "fixed128x18")]
    #[case("ufixed64x10", "ufixed64x10")]
    #[case("string[]", "string[]")]
    #[case("uint256[2][]", "uint256[2][]")]
    #[case("(address, uint)", "(address,uint256)")]
    #[case("(uint256[],(bool,bytes))[3]", "(uint256[],(bool,bytes))[3]")]
    #[case("()", "()")]
    fn canonical_names(#[case] input: &str, #[case] canonical: &str) {
        assert_eq!(input.parse::<ParamType>().unwrap().to_string(), canonical);
    }

    #[rstest]
    #[case("")]
    #[case("uint7")]
    #[case("uint264")]
    #[case("int0")]
    #[case("bytes0")]
    #[case("bytes33")]
    #[case("uint256[0]")]
    #[case("uint256[-1]")]
    #[case("fixed128x81")]
    #[case("(uint256,bool")]
    #[case("(uint256,)")]
    #[case("mapping")]
    fn invalid_types(#[case] input: &str) {
        assert_eq!(
            input.parse::<ParamType>(),
            Err(EncodingError::InvalidType(input.to_string()))
        );
    }

    #[test]
    fn array_suffixes_bind_left_to_right() {
        let kind: ParamType = "uint8[2][]".parse().unwrap();
        assert_eq!(
            kind,
            ParamType::Array(Box::new(ParamType::FixedArray(
                Box::new(ParamType::Uint(8)),
                2
            )))
        );
    }

    #[rstest]
    #[case("uint256", false, 32)]
    #[case("bytes32", false, 32)]
    #[case("string", true, 32)]
    #[case("bytes", true, 32)]
    #[case("address[]", true, 32)]
    #[case("address[3]", false, 96)]
    #[case("string[2]", true, 32)]
    #[case("(uint256,bool)", false, 64)]
    #[case("(uint256,string)", true, 32)]
    #[case("(uint256,bool[2])[2]", false, 192)]
    fn layout(#[case] kind: &str, #[case] dynamic: bool, #[case] head_size: usize) {
        let kind: ParamType = kind.parse().unwrap();
        assert_eq!(kind.is_dynamic(), dynamic);
        assert_eq!(kind.head_size(), head_size);
    }
}
