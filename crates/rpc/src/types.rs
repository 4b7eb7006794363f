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

//! Request parameters and response objects of the `eth` namespace.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use ethkit_primitives::{
    hex::{decode_quantity_u64, encode_quantity},
    DecodeError, Transaction, TransactionKind,
};
use serde::{Deserialize, Serialize, Serializer};

/// The block a state query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Earliest,
    Pending,
    Safe,
    Finalized,
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Earliest => f.write_str("earliest"),
            BlockTag::Pending => f.write_str("pending"),
            BlockTag::Safe => f.write_str("safe"),
            BlockTag::Finalized => f.write_str("finalized"),
            BlockTag::Number(number) => f.write_str(&encode_quantity(U256::from(*number))),
        }
    }
}

impl FromStr for BlockTag {
    type Err = DecodeError;

    /// Accepts a tag name, a decimal block number or a `0x` quantity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            "pending" => Ok(BlockTag::Pending),
            "safe" => Ok(BlockTag::Safe),
            "finalized" => Ok(BlockTag::Finalized),
            _ if s.starts_with("0x") => Ok(BlockTag::Number(decode_quantity_u64(s)?)),
            _ => s
                .parse()
                .map(BlockTag::Number)
                .map_err(|_| DecodeError::InvalidInteger),
        }
    }
}

impl From<u64> for BlockTag {
    fn from(number: u64) -> Self {
        BlockTag::Number(number)
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parameters of `eth_call` and `eth_estimateGas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

impl CallRequest {
    /// A call of `to` with the given call data.
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        CallRequest {
            to: Some(to),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Builds the request for a transaction sent by `from`; zero gas values are left
    /// for the node to choose.
    pub fn from_transaction(tx: &Transaction, from: Option<Address>) -> Self {
        let non_zero = |value: U256| (!value.is_zero()).then_some(value);
        CallRequest {
            from,
            to: match tx.to {
                TransactionKind::Call(to) => Some(to),
                TransactionKind::Create => None,
            },
            gas: non_zero(tx.gas_limit),
            gas_price: non_zero(tx.gas_price),
            value: non_zero(tx.value),
            data: (!tx.data.is_empty()).then(|| tx.data.clone()),
        }
    }
}

/// A transaction as returned by `eth_getTransactionByHash` or inside a full block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: B256,
    pub nonce: U64,
    pub block_hash: Option<B256>,
    pub block_number: Option<U64>,
    pub transaction_index: Option<U64>,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    #[serde(default)]
    pub gas_price: Option<U256>,
    pub gas: U256,
    pub input: Bytes,
    #[serde(default)]
    pub chain_id: Option<U64>,
    #[serde(default)]
    pub v: Option<U64>,
    #[serde(default)]
    pub r: Option<U256>,
    #[serde(default)]
    pub s: Option<U256>,
}

/// An event log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    #[serde(default)]
    pub log_index: Option<U64>,
    #[serde(default)]
    pub removed: bool,
}

/// The receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    pub transaction_index: U64,
    pub block_hash: B256,
    pub block_number: U64,
    pub from: Address,
    pub to: Option<Address>,
    pub cumulative_gas_used: U256,
    pub gas_used: U256,
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
    /// Only present after Byzantium.
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub effective_gas_price: Option<U256>,
}

impl Receipt {
    /// Whether execution succeeded; `None` for pre-Byzantium receipts.
    pub fn succeeded(&self) -> Option<bool> {
        self.status.map(|status| !status.is_zero())
    }
}

/// The transactions of a block: hashes only, or full objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Hashes(Vec<B256>),
    Full(Vec<RpcTransaction>),
}

impl Default for BlockTransactions {
    fn default() -> Self {
        BlockTransactions::Hashes(Vec::new())
    }
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            BlockTransactions::Hashes(hashes) => hashes.len(),
            BlockTransactions::Full(txs) => txs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A block as returned by `eth_getBlockByNumber`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// `None` for a pending block.
    pub number: Option<U64>,
    pub hash: Option<B256>,
    pub parent_hash: B256,
    pub timestamp: U64,
    pub gas_limit: U256,
    pub gas_used: U256,
    pub miner: Address,
    #[serde(default)]
    pub base_fee_per_gas: Option<U256>,
    #[serde(default)]
    pub transactions: BlockTransactions,
}
