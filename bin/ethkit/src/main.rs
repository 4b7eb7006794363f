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

mod cli;

use anyhow::{bail, ensure, Context};
use clap::Parser;
use ethkit_primitives::{
    abi::{decode, parse_value, AbiValue, Function, ParamType},
    hex::encode_data,
    units::{convert, format_units},
    Account, Transaction, TransactionKind,
};
use ethkit_rpc::EthClient;
use log::info;

use crate::cli::{Cli, TxArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse() {
        Cli::NewAccount => {
            let account = Account::random();
            println!("Address:     {}", account.address());
            println!("Private key: {}", encode_data(account.private_key()));
        }
        Cli::Address(args) => {
            println!("{}", args.private_key.address());
        }
        Cli::Selector(args) => {
            let function = Function::parse(&args.signature)
                .with_context(|| format!("invalid signature: {}", args.signature))?;
            println!("{}", encode_data(function.selector()));
        }
        Cli::Encode(args) => {
            let function = Function::parse(&args.signature)
                .with_context(|| format!("invalid signature: {}", args.signature))?;
            let values = parse_args(&function, &args.args)?;
            println!("{}", encode_data(function.encode_input(&values)?));
        }
        Cli::Decode(args) => {
            let ParamType::Tuple(types) = format!("({})", args.types)
                .parse::<ParamType>()
                .with_context(|| format!("invalid types: {}", args.types))?
            else {
                bail!("invalid types: {}", args.types);
            };
            for value in decode(&args.data, &types).context("failed to decode data")? {
                println!("{value}");
            }
        }
        Cli::Convert(args) => {
            println!("{}", convert(args.from, args.to, &args.amount)?);
        }
        Cli::Sign(args) => {
            ensure!(args.tx.nonce.is_some(), "--nonce is required for offline signing");
            ensure!(
                args.tx.gas_limit.is_some(),
                "--gas-limit is required for offline signing"
            );
            let signed = transaction(&args.tx).sign(&args.key.private_key)?;
            println!("{}", signed.raw_hex());
        }
        Cli::Send(args) => {
            let client = EthClient::connect(&args.rpc.config())?;
            let account = &args.key.private_key;
            let signed = client
                .send_transaction(transaction(&args.tx), account)
                .await
                .context("failed to send transaction")?;
            info!("Sent transaction {} from {}", signed.hash(), account.address());
            println!("{}", signed.hash());
        }
        Cli::Balance(args) => {
            let client = EthClient::connect(&args.rpc.config())?;
            let balance = client
                .get_balance(args.address, args.block)
                .await
                .with_context(|| format!("failed to query balance of {}", args.address))?;
            println!("{} {}", format_units(balance, args.unit), args.unit);
        }
        Cli::Call(args) => {
            let function = Function::parse(&args.signature)
                .with_context(|| format!("invalid signature: {}", args.signature))?;
            let values = parse_args(&function, &args.args)?;
            let client = EthClient::connect(&args.rpc.config())?;
            let outputs = client
                .call_function(args.to, &function, &values, args.block)
                .await
                .with_context(|| format!("call of {} failed", function.signature()))?;
            for value in outputs {
                println!("{value}");
            }
        }
    }

    Ok(())
}

/// Parses one command-line argument per function input.
fn parse_args(function: &Function, args: &[String]) -> anyhow::Result<Vec<AbiValue>> {
    ensure!(
        args.len() == function.inputs.len(),
        "{} expects {} arguments, got {}",
        function.signature(),
        function.inputs.len(),
        args.len()
    );
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            parse_value(&param.kind, arg)
                .with_context(|| format!("invalid {} argument: {arg}", param.kind))
        })
        .collect()
}

/// Builds the unsigned transaction; unset gas fields stay zero.
fn transaction(args: &TxArgs) -> Transaction {
    Transaction {
        chain_id: args.chain_id,
        nonce: args.nonce,
        gas_price: args.gas_price.unwrap_or_default(),
        gas_limit: args.gas_limit.unwrap_or_default(),
        to: args.to.map_or(TransactionKind::Create, TransactionKind::Call),
        value: args.value,
        data: args.data.clone(),
    }
}
