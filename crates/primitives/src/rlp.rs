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

//! Recursive Length Prefix encoding.
//!
//! [RlpItem] is a heterogeneous tree of scalars, byte strings and lists. Encoding follows
//! the canonical rules: a single byte below `0x80` is its own encoding, other strings get
//! a `0x80`/`0xb7` length header, lists a `0xc0`/`0xf7` header, and integers are written
//! as their minimal big-endian bytes (zero is the empty string).

use alloy_primitives::{Address, I256, U256};
use alloy_rlp::EMPTY_STRING_CODE;

use crate::error::{DecodeError, EncodingError};

/// Nesting limit applied while decoding untrusted input.
const MAX_DEPTH: usize = 64;

/// A value that can be RLP encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// An unsigned integer, encoded without leading zero bytes.
    Uint(U256),
    /// A signed integer; only non-negative values can be encoded.
    Int(I256),
    /// An arbitrary byte string.
    Bytes(Vec<u8>),
    /// A UTF-8 string, encoded as its bytes.
    String(String),
    /// An ordered list of items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// The empty byte string, `0x80`.
    pub const fn empty() -> Self {
        RlpItem::Bytes(Vec::new())
    }

    /// Appends the encoding of this item to `out`.
    pub fn encode_to(&self, out: &mut Vec<u8>) -> Result<(), EncodingError> {
        match self {
            RlpItem::Uint(value) => encode_uint(value, out),
            RlpItem::Int(value) => {
                if value.is_negative() {
                    return Err(EncodingError::NegativeInteger);
                }
                encode_uint(&value.into_raw(), out);
            }
            RlpItem::Bytes(bytes) => encode_bytes(bytes, out),
            RlpItem::String(string) => encode_bytes(string.as_bytes(), out),
            RlpItem::List(items) => {
                let mut payload = Vec::new();
                for item in items {
                    item.encode_to(&mut payload)?;
                }
                alloy_rlp::Header {
                    list: true,
                    payload_length: payload.len(),
                }
                .encode(out);
                out.extend_from_slice(&payload);
            }
        }
        Ok(())
    }

    /// Returns the payload of a byte string item.
    pub fn as_bytes(&self) -> Result<&[u8], DecodeError> {
        match self {
            RlpItem::Bytes(bytes) => Ok(bytes),
            RlpItem::String(string) => Ok(string.as_bytes()),
            _ => Err(DecodeError::UnexpectedItem("list or integer")),
        }
    }

    /// Returns the elements of a list item.
    pub fn as_list(&self) -> Result<&[RlpItem], DecodeError> {
        match self {
            RlpItem::List(items) => Ok(items),
            _ => Err(DecodeError::UnexpectedItem("string")),
        }
    }

    /// Interprets a decoded byte string as a canonical unsigned integer.
    pub fn as_u256(&self) -> Result<U256, DecodeError> {
        let bytes = self.as_bytes()?;
        if bytes.len() > 32 || bytes.first() == Some(&0) {
            return Err(DecodeError::InvalidInteger);
        }
        Ok(U256::from_be_slice(bytes))
    }

    /// Interprets a decoded byte string as a canonical `u64`.
    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        u64::try_from(self.as_u256()?).map_err(|_| DecodeError::InvalidInteger)
    }
}

fn encode_uint(value: &U256, out: &mut Vec<u8>) {
    if value.is_zero() {
        out.push(EMPTY_STRING_CODE);
        return;
    }
    let bytes = value.to_be_bytes::<32>();
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    encode_bytes(&bytes[leading_zeros..], out);
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if let [byte] = bytes {
        if *byte < EMPTY_STRING_CODE {
            out.push(*byte);
            return;
        }
    }
    alloy_rlp::Header {
        list: false,
        payload_length: bytes.len(),
    }
    .encode(out);
    out.extend_from_slice(bytes);
}

/// Encodes `item` into a fresh buffer.
pub fn encode(item: &RlpItem) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::new();
    item.encode_to(&mut out)?;
    Ok(out)
}

/// Decodes exactly one canonically encoded item; trailing bytes are rejected.
///
/// Scalars come back as [RlpItem::Bytes] since RLP does not record their type.
pub fn decode(data: &[u8]) -> Result<RlpItem, DecodeError> {
    let mut buf = data;
    let item = decode_item(&mut buf, 0)?;
    if !buf.is_empty() {
        return Err(DecodeError::TrailingData);
    }
    Ok(item)
}

fn decode_item(buf: &mut &[u8], depth: usize) -> Result<RlpItem, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::Rlp(alloy_rlp::Error::Custom(
            "maximum nesting depth exceeded",
        )));
    }
    let header = alloy_rlp::Header::decode(buf)?;
    let data: &[u8] = *buf;
    if data.len() < header.payload_length {
        return Err(DecodeError::BufferTooShort);
    }
    let (payload, rest) = data.split_at(header.payload_length);
    *buf = rest;

    if !header.list {
        return Ok(RlpItem::Bytes(payload.to_vec()));
    }
    let mut payload = payload;
    let mut items = Vec::new();
    while !payload.is_empty() {
        items.push(decode_item(&mut payload, depth + 1)?);
    }
    Ok(RlpItem::List(items))
}

impl From<u64> for RlpItem {
    fn from(value: u64) -> Self {
        RlpItem::Uint(U256::from(value))
    }
}

impl From<U256> for RlpItem {
    fn from(value: U256) -> Self {
        RlpItem::Uint(value)
    }
}

impl From<i64> for RlpItem {
    fn from(value: i64) -> Self {
        // every i64 is representable in 256 bits
        RlpItem::Int(I256::try_from(value).expect("i64 fits in I256"))
    }
}

impl From<I256> for RlpItem {
    fn from(value: I256) -> Self {
        RlpItem::Int(value)
    }
}

impl From<&[u8]> for RlpItem {
    fn from(value: &[u8]) -> Self {
        RlpItem::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(value: Vec<u8>) -> Self {
        RlpItem::Bytes(value)
    }
}

impl From<&str> for RlpItem {
    fn from(value: &str) -> Self {
        RlpItem::String(value.to_string())
    }
}

impl From<String> for RlpItem {
    fn from(value: String) -> Self {
        RlpItem::String(value)
    }
}

impl From<Address> for RlpItem {
    fn from(value: Address) -> Self {
        RlpItem::Bytes(value.to_vec())
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(value: Vec<RlpItem>) -> Self {
        RlpItem::List(value)
    }
}
