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

use ethkit_primitives::{DecodeError, EncodingError, TransactionError};

/// Errors returned by the [EthClient](crate::EthClient).
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The HTTP request could not be completed.
    #[error("transport error")]
    Transport(#[from] reqwest::Error),
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
    /// The transport returned an empty body.
    #[error("no response from node")]
    NoResponse,
    /// The node answered with a JSON-RPC error envelope.
    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },
    /// The response is neither a result nor an error envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
