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

//! The contract ABI codec.
//!
//! Values are laid out in 32-byte words. Static values are written in place into the head
//! of their enclosing block; dynamic values leave an offset in the head, relative to the
//! start of the block, and are appended to the block's tail.

mod decode;
mod encode;
mod function;
mod token;
mod types;
mod value;

pub use decode::decode;
pub use encode::{encode, encode_call};
pub use function::{ContractMethod, ContractParam, Function, Param};
pub use token::parse_value;
pub use types::ParamType;
pub use value::AbiValue;

pub use crate::keccak::selector;
use crate::error::EncodingError;

/// Splits `s` at the commas that are not nested inside brackets, parentheses or quotes.
///
/// Returns `None` if the delimiters are unbalanced. Blank input yields no parts.
pub(crate) fn split_top_level(s: &str) -> Option<Vec<&str>> {
    if s.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            _ if quoted => {}
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quoted {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}

/// Checks that `name` is an ASCII identifier usable in a method signature.
pub(crate) fn validate_method_name(name: &str) -> Result<(), EncodingError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(EncodingError::InvalidMethodName(name.to_string()))
    }
}
