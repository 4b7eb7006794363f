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

use std::iter;

use alloy_primitives::{Address, I256, U256};

use crate::{
    abi::{value::fits_signed, AbiValue, ParamType},
    error::DecodeError,
};

/// Decodes a parameter block holding values of the given types.
///
/// Bytes following the last value are ignored, as nodes may return more data than the
/// declared outputs describe.
pub fn decode(data: &[u8], types: &[ParamType]) -> Result<Vec<AbiValue>, DecodeError> {
    Decoder::new(data).sequence(0, types)
}

/// Decoder over one input buffer.
///
/// Every word read is charged against a budget proportional to the input length, so
/// offsets that alias the same tail cannot make the output grow faster than the input.
struct Decoder<'a> {
    data: &'a [u8],
    budget: usize,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        // a canonical encoding reads each word once
        Decoder {
            data,
            budget: 2 * (data.len() / 32 + 1),
        }
    }

    fn charge(&mut self, units: usize) -> Result<(), DecodeError> {
        self.budget = self
            .budget
            .checked_sub(units)
            .ok_or(DecodeError::BufferTooShort)?;
        Ok(())
    }

    /// Decodes a block that starts at `data[base..]`; dynamic offsets are relative to `base`.
    fn sequence<'t>(
        &mut self,
        base: usize,
        types: impl IntoIterator<Item = &'t ParamType>,
    ) -> Result<Vec<AbiValue>, DecodeError> {
        let mut cursor = base;
        let mut values = Vec::new();
        for kind in types {
            let value = if kind.is_dynamic() {
                let offset = self.read_usize(cursor)?;
                let start = base.checked_add(offset).ok_or(DecodeError::BufferTooShort)?;
                self.value(start, kind)?
            } else {
                self.value(cursor, kind)?
            };
            values.push(value);
            cursor = cursor
                .checked_add(kind.head_size())
                .ok_or(DecodeError::BufferTooShort)?;
        }
        Ok(values)
    }

    fn value(&mut self, at: usize, kind: &ParamType) -> Result<AbiValue, DecodeError> {
        match kind {
            ParamType::Address => {
                let word = self.read_word(at)?;
                check_zeros(&word[..12])?;
                Ok(AbiValue::Address(Address::from_slice(&word[12..])))
            }
            ParamType::Bool => match U256::from_be_bytes(self.read_word(at)?) {
                value if value.is_zero() => Ok(AbiValue::Bool(false)),
                value if value == U256::from(1) => Ok(AbiValue::Bool(true)),
                _ => Err(DecodeError::InvalidBool),
            },
            ParamType::Uint(bits) | ParamType::Ufixed(bits, _) => {
                let value = U256::from_be_bytes(self.read_word(at)?);
                if value.bit_len() > *bits {
                    return Err(DecodeError::InvalidInteger);
                }
                Ok(AbiValue::Uint(value))
            }
            ParamType::Int(bits) | ParamType::Fixed(bits, _) => {
                let value = I256::from_raw(U256::from_be_bytes(self.read_word(at)?));
                if !fits_signed(&value, *bits) {
                    return Err(DecodeError::InvalidInteger);
                }
                Ok(AbiValue::Int(value))
            }
            ParamType::String => {
                let bytes = self.read_bytes(at)?;
                let string =
                    String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)?;
                Ok(AbiValue::String(string))
            }
            ParamType::Bytes => Ok(AbiValue::Bytes(self.read_bytes(at)?.to_vec())),
            ParamType::FixedBytes(len) => {
                let word = self.read_word(at)?;
                check_zeros(&word[*len..])?;
                Ok(AbiValue::FixedBytes(word[..*len].to_vec()))
            }
            ParamType::Array(inner) => {
                let len = self.read_usize(at)?;
                let start = at + 32;
                // every element needs at least its head in the remaining input
                let available = self.data.len().saturating_sub(start);
                if len > available / inner.head_size().max(1) {
                    return Err(DecodeError::BufferTooShort);
                }
                if inner.head_size() == 0 {
                    // elements that read no words are charged one unit each
                    self.charge(len)?;
                }
                let items = self.sequence(start, iter::repeat(inner.as_ref()).take(len))?;
                Ok(AbiValue::Array(items))
            }
            ParamType::FixedArray(inner, len) => {
                let items = self.sequence(at, iter::repeat(inner.as_ref()).take(*len))?;
                Ok(AbiValue::FixedArray(items))
            }
            ParamType::Tuple(kinds) => Ok(AbiValue::Tuple(self.sequence(at, kinds)?)),
        }
    }

    fn read_word(&mut self, at: usize) -> Result<[u8; 32], DecodeError> {
        let end = at.checked_add(32).ok_or(DecodeError::BufferTooShort)?;
        let word = self.data.get(at..end).ok_or(DecodeError::BufferTooShort)?;
        self.charge(1)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(word);
        Ok(out)
    }

    fn read_usize(&mut self, at: usize) -> Result<usize, DecodeError> {
        let value = U256::from_be_bytes(self.read_word(at)?);
        usize::try_from(value).map_err(|_| DecodeError::InvalidInteger)
    }

    /// Reads a length-prefixed byte string.
    fn read_bytes(&mut self, at: usize) -> Result<&'a [u8], DecodeError> {
        let len = self.read_usize(at)?;
        let start = at + 32;
        let end = start.checked_add(len).ok_or(DecodeError::BufferTooShort)?;
        let data = self.data;
        let bytes = data.get(start..end).ok_or(DecodeError::BufferTooShort)?;
        self.charge(len.div_ceil(32))?;
        Ok(bytes)
    }
}

fn check_zeros(padding: &[u8]) -> Result<(), DecodeError> {
    if padding.iter().all(|&b| b == 0) {
        Ok(())
    } else {
        Err(DecodeError::InvalidPadding)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;
    use crate::abi::encode;

    fn types(list: &[&str]) -> Vec<ParamType> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn static_roundtrip() {
        let value = AbiValue::from(1212112122u64);
        let decoded = decode(&encode(&[value.clone()]), &[ParamType::Uint(256)]).unwrap();
        assert_eq!(decoded, vec![value]);
    }

    #[test]
    fn roundtrip_all_kinds() {
        let kinds = types(&[
            "address",
            "bool",
            "uint8",
            "int16",
            "bytes3",
            "string",
            "bytes",
            "uint256[]",
            "string[2]",
            "(uint64,bool[])",
            "int256[][]",
        ]);
        let values = vec![
            AbiValue::from(address!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f")),
            AbiValue::from(true),
            AbiValue::from(255u64),
            AbiValue::Int(I256::try_from(-300).unwrap()),
            AbiValue::FixedBytes(vec![1, 2, 3]),
            AbiValue::from("ünïcode"),
            AbiValue::Bytes(vec![0xab; 33]),
            AbiValue::Array(vec![]),
            AbiValue::FixedArray(vec![AbiValue::from("a"), AbiValue::from("")]),
            AbiValue::Tuple(vec![
                AbiValue::from(7u64),
                AbiValue::Array(vec![AbiValue::from(false), AbiValue::from(true)]),
            ]),
            AbiValue::Array(vec![
                AbiValue::Array(vec![AbiValue::Int(I256::MIN)]),
                AbiValue::Array(vec![]),
            ]),
        ];
        for (value, kind) in values.iter().zip(&kinds) {
            value.type_check(kind).unwrap();
        }
        assert_eq!(decode(&encode(&values), &kinds).unwrap(), values);
    }

    #[test]
    fn balance_of_output() {
        let output = hex!("0000000000000000000000000000000000000000000000000de0b6b3a7640000");
        let decoded = decode(&output, &[ParamType::Uint(256)]).unwrap();
        assert_eq!(
            decoded,
            vec![AbiValue::Uint(U256::from(1_000_000_000_000_000_000u64))]
        );
    }

    #[rstest]
    #[case(&[], "uint256")]
    #[case(&hex!("0000000000000000000000000000000000000000000000000000000000000001"), "(uint256,uint256)")]
    // offset points past the end
    #[case(&hex!("0000000000000000000000000000000000000000000000000000000000000040"), "string")]
    // length larger than the remaining input
    #[case(&hex!("00000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000005"), "bytes")]
    // huge array length
    #[case(&hex!("0000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000ffffffffffffffff"), "uint256[]")]
    fn buffer_too_short(#[case] data: &[u8], #[case] kind: &str) {
        assert!(matches!(
            decode(data, &types(&[kind])),
            Err(DecodeError::BufferTooShort)
        ));
    }

    #[test]
    fn invalid_words() {
        let word = hex!("0000000000000000000000000000000000000000000000000000000000000100");
        assert!(matches!(
            decode(&word, &types(&["uint8"])),
            Err(DecodeError::InvalidInteger)
        ));
        assert!(matches!(
            decode(&word, &types(&["bool"])),
            Err(DecodeError::InvalidBool)
        ));
        assert!(matches!(
            decode(&[0xffu8; 32], &types(&["address"])),
            Err(DecodeError::InvalidPadding)
        ));
        assert!(matches!(
            decode(&[0x7fu8; 32], &types(&["int8"])),
            Err(DecodeError::InvalidInteger)
        ));
        assert_eq!(
            decode(&[0xffu8; 32], &types(&["int8"])).unwrap(),
            vec![AbiValue::Int(I256::MINUS_ONE)]
        );
        assert!(matches!(
            decode(&[0xffu8; 32], &types(&["bytes4"])),
            Err(DecodeError::InvalidPadding)
        ));
        // offset word that does not fit into usize
        assert!(matches!(
            decode(&[0xffu8; 32], &types(&["string"])),
            Err(DecodeError::InvalidInteger)
        ));
    }

    /// `uint256[][]` whose `outer` entries all point at one inner array of `inner` words.
    fn aliased_nested_array(outer: usize, inner: usize) -> Vec<u8> {
        let word = |value: usize| U256::from(value).to_be_bytes::<32>();
        let mut data = Vec::new();
        data.extend(word(0x20));
        data.extend(word(outer));
        for _ in 0..outer {
            data.extend(word(outer * 32));
        }
        data.extend(word(inner));
        for i in 0..inner {
            data.extend(word(i));
        }
        data
    }

    #[test]
    fn aliased_offsets_are_bounded_by_input_size() {
        let kinds = types(&["uint256[][]"]);

        let decoded = decode(&aliased_nested_array(2, 2), &kinds).unwrap();
        let inner = AbiValue::Array(vec![AbiValue::from(0u64), AbiValue::from(1u64)]);
        assert_eq!(decoded, vec![AbiValue::Array(vec![inner.clone(), inner])]);

        assert!(matches!(
            decode(&aliased_nested_array(64, 64), &kinds),
            Err(DecodeError::BufferTooShort)
        ));
    }

    #[test]
    fn invalid_utf8() {
        let encoded = encode(&[AbiValue::Bytes(vec![0xff, 0xfe])]);
        assert!(matches!(
            decode(&encoded, &types(&["string"])),
            Err(DecodeError::InvalidUtf8)
        ));
    }
}
