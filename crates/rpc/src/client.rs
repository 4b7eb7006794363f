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

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, Bytes, ChainId, B256, U256, U64};
use ethkit_primitives::{
    abi::{AbiValue, Function},
    signer::Account,
    transaction::{SignedTransaction, Transaction},
};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    jsonrpc::{parse_response, Request},
    transport::{ClientConfig, HttpTransport, Transport},
    types::{Block, BlockTag, CallRequest, Receipt, RpcTransaction},
    RpcError,
};

/// A client for the `eth`, `net` and `web3` JSON-RPC namespaces.
#[derive(Debug)]
pub struct EthClient<T = HttpTransport> {
    transport: T,
    next_id: AtomicU64,
}

impl EthClient<HttpTransport> {
    /// Connects to the HTTP endpoint in `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> EthClient<T> {
    pub fn new(transport: T) -> Self {
        EthClient {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a single request and deserializes its result.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("Querying RPC for {method}");
        let payload = Request::new(id, method, params).to_bytes()?;
        let body = self.transport.send(payload).await?;
        trace!("{method} #{id}: {}", String::from_utf8_lossy(&body));
        parse_response(&body)
    }

    pub async fn client_version(&self) -> Result<String, RpcError> {
        self.request("web3_clientVersion", json!([])).await
    }

    /// The network id; reported by nodes as a decimal string.
    pub async fn net_version(&self) -> Result<String, RpcError> {
        self.request("net_version", json!([])).await
    }

    pub async fn chain_id(&self) -> Result<ChainId, RpcError> {
        let chain_id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(chain_id.to())
    }

    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let number: U64 = self.request("eth_blockNumber", json!([])).await?;
        Ok(number.to())
    }

    pub async fn gas_price(&self) -> Result<U256, RpcError> {
        self.request("eth_gasPrice", json!([])).await
    }

    pub async fn get_balance(&self, address: Address, block: BlockTag) -> Result<U256, RpcError> {
        self.request("eth_getBalance", json!([address, block])).await
    }

    pub async fn get_transaction_count(
        &self,
        address: Address,
        block: BlockTag,
    ) -> Result<u64, RpcError> {
        let count: U64 = self
            .request("eth_getTransactionCount", json!([address, block]))
            .await?;
        Ok(count.to())
    }

    pub async fn get_code(&self, address: Address, block: BlockTag) -> Result<Bytes, RpcError> {
        self.request("eth_getCode", json!([address, block])).await
    }

    /// Executes a message call without creating a transaction.
    pub async fn call(&self, request: &CallRequest, block: BlockTag) -> Result<Bytes, RpcError> {
        self.request("eth_call", json!([request, block])).await
    }

    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<U256, RpcError> {
        self.request("eth_estimateGas", json!([request])).await
    }

    /// Broadcasts a signed transaction and returns its hash as reported by the node.
    pub async fn send_raw_transaction(&self, tx: &SignedTransaction) -> Result<B256, RpcError> {
        let hash: B256 = self
            .request("eth_sendRawTransaction", json!([tx.raw()]))
            .await?;
        if hash != tx.hash() {
            debug!("node reported hash {hash}, expected {}", tx.hash());
        }
        Ok(hash)
    }

    pub async fn get_transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<RpcTransaction>, RpcError> {
        self.request("eth_getTransactionByHash", json!([hash]))
            .await
    }

    /// Returns `None` while the transaction is pending or unknown.
    pub async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash]))
            .await
    }

    pub async fn get_block_by_number(
        &self,
        block: BlockTag,
        full_transactions: bool,
    ) -> Result<Option<Block>, RpcError> {
        self.request("eth_getBlockByNumber", json!([block, full_transactions]))
            .await
    }

    /// Fills in the fields of `tx` left unset, querying the node for each.
    ///
    /// The nonce includes pending transactions of `from`. A zero gas limit is replaced by
    /// the node's estimate.
    pub async fn prepare_transaction(
        &self,
        mut tx: Transaction,
        from: Address,
    ) -> Result<Transaction, RpcError> {
        if tx.nonce.is_none() {
            tx.nonce = Some(self.get_transaction_count(from, BlockTag::Pending).await?);
        }
        if tx.chain_id.is_none() {
            tx.chain_id = Some(self.chain_id().await?);
        }
        if tx.gas_price.is_zero() {
            tx.gas_price = self.gas_price().await?;
        }
        if tx.gas_limit.is_zero() {
            let request = CallRequest::from_transaction(&tx, Some(from));
            tx.gas_limit = self.estimate_gas(&request).await?;
        }
        Ok(tx)
    }

    /// Prepares, signs and broadcasts `tx` from `account`.
    pub async fn send_transaction(
        &self,
        tx: Transaction,
        account: &Account,
    ) -> Result<SignedTransaction, RpcError> {
        let tx = self.prepare_transaction(tx, account.address()).await?;
        let signed = tx.sign(account)?;
        self.send_raw_transaction(&signed).await?;
        Ok(signed)
    }

    /// Calls a contract function and decodes its return values.
    pub async fn call_function(
        &self,
        to: Address,
        function: &Function,
        args: &[AbiValue],
        block: BlockTag,
    ) -> Result<Vec<AbiValue>, RpcError> {
        let request = CallRequest::new(to, function.encode_input(args)?);
        let output = self.call(&request, block).await?;
        Ok(function.decode_output(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use alloy_primitives::{address, b256};
    use async_trait::async_trait;
    use hex_literal::hex;

    use super::*;

    /// Replays canned results and records every request.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<Vec<u8>>>,
        requests: Mutex<Vec<Value>>,
    }

    impl MockTransport {
        fn with_results(results: impl IntoIterator<Item = Value>) -> Self {
            let responses = results
                .into_iter()
                .map(|result| {
                    serde_json::to_vec(&json!({"jsonrpc": "2.0", "id": 0, "result": result}))
                        .unwrap()
                })
                .collect();
            MockTransport {
                responses: Mutex::new(responses),
                ..Default::default()
            }
        }

        fn push_raw(&self, body: &[u8]) {
            self.responses.lock().unwrap().push_back(body.to_vec());
        }

        fn methods(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r["method"].as_str().unwrap().to_string())
                .collect()
        }

        fn params(&self, index: usize) -> Value {
            self.requests.lock().unwrap()[index]["params"].clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, payload: Vec<u8>) -> Result<Vec<u8>, RpcError> {
            self.requests
                .lock()
                .unwrap()
                .push(serde_json::from_slice(&payload).unwrap());
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    const KEY: [u8; 32] = hex!("4646464646464646464646464646464646464646464646464646464646464646");
    const TO: Address = address!("3535353535353535353535353535353535353535");

    #[tokio::test]
    async fn simple_queries() {
        let client = EthClient::new(MockTransport::with_results([
            json!("0x1"),
            json!("0x10d4f"),
            json!("0xde0b6b3a7640000"),
            json!("Geth/v1.14.0"),
        ]));

        assert_eq!(client.chain_id().await.unwrap(), 1);
        assert_eq!(client.block_number().await.unwrap(), 68943);
        let balance = client.get_balance(TO, BlockTag::Latest).await.unwrap();
        assert_eq!(balance, U256::from(10).pow(U256::from(18)));
        assert_eq!(client.client_version().await.unwrap(), "Geth/v1.14.0");

        let transport = client.transport();
        assert_eq!(
            transport.methods(),
            ["eth_chainId", "eth_blockNumber", "eth_getBalance", "web3_clientVersion"]
        );
        assert_eq!(
            transport.params(2),
            json!(["0x3535353535353535353535353535353535353535", "latest"])
        );
    }

    #[tokio::test]
    async fn request_ids_increase() {
        let client = EthClient::new(MockTransport::with_results([json!("1"), json!("1")]));
        client.net_version().await.unwrap();
        client.net_version().await.unwrap();
        let requests = client.transport().requests.lock().unwrap();
        assert_eq!(requests[0]["id"], json!(1));
        assert_eq!(requests[1]["id"], json!(2));
        assert_eq!(requests[0]["jsonrpc"], json!("2.0"));
    }

    #[tokio::test]
    async fn node_errors() {
        let transport = MockTransport::default();
        transport.push_raw(br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"nonce too low"}}"#);
        let client = EthClient::new(transport);

        match client.gas_price().await {
            Err(RpcError::Node { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "nonce too low");
            }
            other => panic!("unexpected {other:?}"),
        }
        // the queue is drained, so the next body is empty
        assert!(matches!(
            client.gas_price().await,
            Err(RpcError::NoResponse)
        ));
    }

    #[tokio::test]
    async fn missing_receipt() {
        let client = EthClient::new(MockTransport::with_results([Value::Null]));
        let receipt = client
            .get_transaction_receipt(b256!(
                "33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"
            ))
            .await
            .unwrap();
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn send_transaction_fills_missing_fields() {
        let client = EthClient::new(MockTransport::with_results([
            json!("0x9"),
            json!("0x1"),
            json!("0x4a817c800"),
            json!("0x5208"),
            json!("0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"),
        ]));
        let account = Account::from_private_key(&KEY).unwrap();
        let tx = Transaction::call(TO).with_value(U256::from(10).pow(U256::from(18)));

        let signed = client.send_transaction(tx, &account).await.unwrap();
        assert_eq!(
            signed.raw().to_vec(),
            hex!("f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83")
        );

        let transport = client.transport();
        assert_eq!(
            transport.methods(),
            [
                "eth_getTransactionCount",
                "eth_chainId",
                "eth_gasPrice",
                "eth_estimateGas",
                "eth_sendRawTransaction"
            ]
        );
        assert_eq!(
            transport.params(0),
            json!(["0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f", "pending"])
        );
        assert_eq!(
            transport.params(3),
            json!([{
                "from": "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f",
                "to": "0x3535353535353535353535353535353535353535",
                "gasPrice": "0x4a817c800",
                "value": "0xde0b6b3a7640000"
            }])
        );
        assert_eq!(transport.params(4), json!([signed.raw_hex()]));
    }

    #[tokio::test]
    async fn call_function() {
        let function = Function::parse("balanceOf(address)(uint256)").unwrap();
        let client = EthClient::new(MockTransport::with_results([json!(
            "0x00000000000000000000000000000000000000000000000000000000000003e8"
        )]));

        let output = client
            .call_function(TO, &function, &[AbiValue::Address(TO)], BlockTag::Latest)
            .await
            .unwrap();
        assert_eq!(output, [AbiValue::Uint(U256::from(1000))]);

        let params = client.transport().params(0);
        assert_eq!(params[1], json!("latest"));
        assert_eq!(
            params[0]["data"],
            json!("0x70a082310000000000000000000000003535353535353535353535353535353535353535")
        );
    }
}
