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

use std::time::Duration;

use alloy_primitives::{Address, ChainId, TxNumber, U256};
use ethkit_primitives::{
    hex::decode_data,
    units::{parse_amount, Unit},
    Account, Bytes,
};
use ethkit_rpc::{BlockTag, ClientConfig};

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "ethkit")]
#[command(bin_name = "ethkit")]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Generate a new random account
    NewAccount,
    /// Print the address of a private key
    Address(KeyArgs),
    /// Compute the 4-byte selector of a function signature
    Selector(SelectorArgs),
    /// ABI-encode a function call
    Encode(EncodeArgs),
    /// ABI-decode data against a list of types
    Decode(DecodeArgs),
    /// Convert an amount between denominations
    Convert(ConvertArgs),
    /// Sign a legacy transaction offline and print its raw encoding
    Sign(SignArgs),
    /// Sign and broadcast a transaction
    Send(SendArgs),
    /// Query the balance of an address
    Balance(BalanceArgs),
    /// Call a contract function without creating a transaction
    Call(CallArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct KeyArgs {
    #[clap(short = 'k', long, env = "ETH_PRIVATE_KEY", hide_env_values = true)]
    /// Hex-encoded private key of the sender
    pub private_key: Account,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RpcArgs {
    #[clap(short = 'u', long, env = "ETH_RPC_URL")]
    /// URL of the JSON-RPC endpoint
    pub rpc_url: String,

    #[clap(long, default_value_t = 30)]
    /// Request timeout in seconds
    pub timeout: u64,
}

impl RpcArgs {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.rpc_url).with_timeout(Duration::from_secs(self.timeout))
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct SelectorArgs {
    /// Function signature, e.g. `transfer(address,uint256)`
    pub signature: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Function signature, e.g. `transfer(address,uint256)`
    pub signature: String,
    /// One argument per input, e.g. `0x35..35` `[1,2]` `"text"`
    pub args: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Comma-separated types, e.g. `uint256,string`
    pub types: String,
    /// Hex-encoded data
    #[clap(value_parser = parse_bytes)]
    pub data: Bytes,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Decimal amount
    pub amount: String,

    #[clap(short = 'f', long, default_value = "wei")]
    pub from: Unit,

    #[clap(short = 't', long, default_value = "ether")]
    pub to: Unit,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TxArgs {
    #[clap(long)]
    /// Recipient; a contract is created when omitted
    pub to: Option<Address>,

    #[clap(long, value_parser = parse_amount, default_value = "0")]
    /// Amount to transfer, e.g. `1.5ether` (default unit: wei)
    pub value: U256,

    #[clap(long, value_parser = parse_bytes, default_value = "0x")]
    /// Call data or init code
    pub data: Bytes,

    #[clap(long, value_parser = parse_amount)]
    /// Gas price, e.g. `20gwei`
    pub gas_price: Option<U256>,

    #[clap(long)]
    pub gas_limit: Option<U256>,

    #[clap(long)]
    pub nonce: Option<TxNumber>,

    #[clap(long, env = "ETH_CHAIN_ID")]
    /// EIP-155 chain id; the transaction is not replay-protected without it
    pub chain_id: Option<ChainId>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SignArgs {
    #[clap(flatten)]
    pub key: KeyArgs,

    #[clap(flatten)]
    pub tx: TxArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SendArgs {
    #[clap(flatten)]
    pub key: KeyArgs,

    #[clap(flatten)]
    pub rpc: RpcArgs,

    #[clap(flatten)]
    pub tx: TxArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BalanceArgs {
    pub address: Address,

    #[clap(flatten)]
    pub rpc: RpcArgs,

    #[clap(short = 'b', long, default_value = "latest")]
    /// Block tag or number
    pub block: BlockTag,

    #[clap(long, default_value = "ether")]
    /// Denomination to print the balance in
    pub unit: Unit,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CallArgs {
    /// Contract address
    pub to: Address,
    /// Function signature with outputs, e.g. `balanceOf(address)(uint256)`
    pub signature: String,
    pub args: Vec<String>,

    #[clap(flatten)]
    pub rpc: RpcArgs,

    #[clap(short = 'b', long, default_value = "latest")]
    pub block: BlockTag,
}

fn parse_bytes(value: &str) -> Result<Bytes, String> {
    decode_data(value)
        .map(Bytes::from)
        .map_err(|err| err.to_string())
}
