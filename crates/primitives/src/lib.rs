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

//! Wire-format primitives for talking to Ethereum nodes: the RLP and contract ABI
//! codecs, secp256k1 signing with EIP-155 replay protection, and the legacy
//! transaction model that ties them together.
//!
//! Everything in this crate is synchronous and free of shared state.

pub mod abi;
pub mod error;
pub mod hex;
pub mod keccak;
pub mod keystore;
pub mod rlp;
pub mod signature;
pub mod signer;
pub mod transaction;
pub mod units;

pub use alloy_primitives::{Address, Bytes, ChainId, TxNumber, B256, I256, U256};

pub use crate::{
    abi::{AbiValue, ContractMethod, ContractParam, Function, ParamType},
    error::{
        DecodeError, EncodingError, KeyError, KeyStoreError, SigningError, TransactionError,
        UnitError,
    },
    keccak::keccak,
    rlp::RlpItem,
    signature::Signature,
    signer::{sign, Account},
    transaction::{SignedTransaction, Transaction, TransactionKind},
    units::Unit,
};
