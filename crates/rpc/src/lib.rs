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

//! An async JSON-RPC client for Ethereum nodes, built on the codecs and signing of
//! [ethkit_primitives].

pub mod client;
pub mod error;
pub mod jsonrpc;
pub mod transport;
pub mod types;

pub use crate::{
    client::EthClient,
    error::RpcError,
    transport::{ClientConfig, HttpTransport, Transport},
    types::{Block, BlockTag, BlockTransactions, CallRequest, Log, Receipt, RpcTransaction},
};
