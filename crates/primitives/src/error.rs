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

use alloy_primitives::Address;
use thiserror::Error as ThisError;

/// Errors raised while turning typed values into wire bytes.
///
/// These are always caused by the caller's input and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum EncodingError {
    /// RLP has no representation for negative integers.
    #[error("negative integers cannot be RLP encoded")]
    NegativeInteger,
    /// The method name is empty, not ASCII, or not a valid identifier.
    #[error("invalid method name: {0:?}")]
    InvalidMethodName(String),
    /// The ABI type string could not be parsed.
    #[error("invalid ABI type: {0:?}")]
    InvalidType(String),
    /// A value does not match the ABI type it was declared with.
    #[error("value does not match ABI type {0}")]
    TypeMismatch(String),
    /// An integer does not fit into the declared bit width.
    #[error("integer does not fit into {0}")]
    IntegerOverflow(String),
    /// A fixed-size value has the wrong number of elements or bytes.
    #[error("expected {expected} elements for {kind}, got {actual}")]
    InvalidLength {
        kind: String,
        expected: usize,
        actual: usize,
    },
    /// The number of arguments does not match the method's parameter list.
    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },
    /// A textual argument could not be interpreted as a value of its ABI type.
    #[error("cannot parse {input:?} as {kind}")]
    InvalidArgument { kind: String, input: String },
}

/// Errors raised while decoding chain-format data.
///
/// Decoding is all or nothing: a single malformed word fails the whole value.
#[derive(Debug, ThisError)]
pub enum DecodeError {
    /// The input ended before the value did, or an offset points past the end.
    #[error("buffer too short")]
    BufferTooShort,
    /// An integer is out of range for its type or is not canonically encoded.
    #[error("invalid integer")]
    InvalidInteger,
    /// An ABI boolean word holds something other than 0 or 1.
    #[error("invalid boolean")]
    InvalidBool,
    /// Padding bytes of an ABI word are not zero.
    #[error("non-zero padding")]
    InvalidPadding,
    /// A decoded string is not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// A string expected to hold hex digits does not.
    #[error("invalid hex string")]
    InvalidHex,
    /// The call data does not start with the expected method selector.
    #[error("selector mismatch: expected 0x{expected}, got 0x{actual}")]
    SelectorMismatch { expected: String, actual: String },
    /// Bytes were left over after the value was decoded.
    #[error("trailing data")]
    TrailingData,
    /// A list was found where a scalar was expected, or the other way around.
    #[error("unexpected RLP {0}")]
    UnexpectedItem(&'static str),
    /// The RLP structure does not describe a legacy transaction.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(&'static str),
    #[error("RLP error")]
    Rlp(#[source] alloy_rlp::Error),
}

impl From<alloy_rlp::Error> for DecodeError {
    fn from(err: alloy_rlp::Error) -> Self {
        match err {
            alloy_rlp::Error::InputTooShort => DecodeError::BufferTooShort,
            alloy_rlp::Error::Overflow | alloy_rlp::Error::LeadingZero => {
                DecodeError::InvalidInteger
            }
            other => DecodeError::Rlp(other),
        }
    }
}

/// Errors raised when importing a private key.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KeyError {
    /// The key has the wrong length, is not hex, or is not a valid curve scalar.
    #[error("invalid private key")]
    InvalidPrivateKey,
}

/// Errors raised by the signing engine.
#[derive(Debug, ThisError)]
pub enum SigningError {
    #[error(transparent)]
    Key(#[from] KeyError),
    /// The ECDSA primitive failed to produce a usable signature.
    #[error("signature creation failed")]
    SignatureCreationFailed,
    /// The signature cannot be used to recover a public key.
    #[error("invalid signature: {0}")]
    InvalidSignature(&'static str),
}

/// Errors raised while moving a transaction from unsigned to signed.
#[derive(Debug, ThisError)]
pub enum TransactionError {
    /// The nonce must be populated before a transaction can be signed.
    #[error("transaction nonce is not set")]
    MissingNonce,
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// Errors raised by denomination conversions.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum UnitError {
    #[error("invalid decimal number: {0:?}")]
    InvalidNumber(String),
    #[error("unknown unit: {0:?}")]
    UnknownUnit(String),
    /// The amount has more fractional digits than the target precision.
    #[error("at most {max} decimal places are supported")]
    TooManyDecimals { max: usize },
    #[error("amount does not fit into 256 bits")]
    Overflow,
}

/// Errors raised by key storage back ends.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KeyStoreError {
    #[error("no key stored for {0}")]
    NotFound(Address),
}
