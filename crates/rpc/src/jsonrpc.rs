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

//! JSON-RPC 2.0 envelopes.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::RpcError;

/// A JSON-RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> Request<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RpcError> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// Interprets a response body as either a result of type `R` or a node error.
///
/// The node's error code and message are passed through verbatim.
pub fn parse_response<R: DeserializeOwned>(body: &[u8]) -> Result<R, RpcError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RpcError::NoResponse);
    }
    let mut envelope: Map<String, Value> = serde_json::from_slice(body)?;

    match envelope.remove("error") {
        None | Some(Value::Null) => {}
        Some(error) => {
            let ErrorObject { code, message } = serde_json::from_value(error.clone())
                .map_err(|_| RpcError::InvalidResponse(error.to_string()))?;
            return Err(RpcError::Node { code, message });
        }
    }
    match envelope.remove("result") {
        Some(result) => Ok(serde_json::from_value(result)?),
        None => Err(RpcError::InvalidResponse(
            "neither result nor error present".to_string(),
        )),
    }
}
