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

use std::str::FromStr;

use crate::{
    abi::{decode, encode_call, split_top_level, validate_method_name, AbiValue, ParamType},
    error::{DecodeError, EncodingError},
    hex,
    keccak::selector,
};

/// A named function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Empty when the parameter is anonymous.
    pub name: String,
    pub kind: ParamType,
}

/// A contract function description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<ParamType>,
        outputs: Vec<ParamType>,
    ) -> Result<Self, EncodingError> {
        let name = name.into();
        validate_method_name(&name)?;
        let anonymous = |kind| Param {
            name: String::new(),
            kind,
        };
        Ok(Function {
            name,
            inputs: inputs.into_iter().map(anonymous).collect(),
            outputs: outputs.into_iter().map(anonymous).collect(),
        })
    }

    /// Parses a human-readable signature such as `balanceOf(address owner)(uint256)` or
    /// `transfer(address,uint256) returns (bool)`.
    pub fn parse(signature: &str) -> Result<Self, EncodingError> {
        let invalid = || EncodingError::InvalidType(signature.to_string());

        let signature = signature.trim();
        let signature = signature.strip_prefix("function ").unwrap_or(signature);
        let open = signature.find('(').ok_or_else(invalid)?;
        let name = signature[..open].trim();
        validate_method_name(name)?;

        let (inputs, rest) = take_group(&signature[open..]).ok_or_else(invalid)?;
        let rest = rest.trim();
        let rest = rest.strip_prefix("returns").unwrap_or(rest).trim();
        let outputs = if rest.is_empty() {
            Vec::new()
        } else {
            let (outputs, rest) = take_group(rest).ok_or_else(invalid)?;
            if !rest.trim().is_empty() {
                return Err(invalid());
            }
            parse_params(outputs).ok_or_else(invalid)?
        };

        Ok(Function {
            name: name.to_string(),
            inputs: parse_params(inputs).ok_or_else(invalid)?,
            outputs,
        })
    }

    /// The canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        selector(&self.signature())
    }

    /// Encodes a call with the given arguments.
    pub fn encode_input(&self, args: &[AbiValue]) -> Result<Vec<u8>, EncodingError> {
        if args.len() != self.inputs.len() {
            return Err(EncodingError::ArgumentCount {
                expected: self.inputs.len(),
                actual: args.len(),
            });
        }
        let typed: Vec<(ParamType, AbiValue)> = self
            .inputs
            .iter()
            .zip(args)
            .map(|(param, value)| (param.kind.clone(), value.clone()))
            .collect();
        encode_call(&self.name, &typed)
    }

    /// Decodes call data produced by [Function::encode_input].
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
        let (actual, args) = data.split_at_checked(4).ok_or(DecodeError::BufferTooShort)?;
        let expected = self.selector();
        if actual != expected {
            return Err(DecodeError::SelectorMismatch {
                expected: alloy_primitives::hex::encode(expected),
                actual: alloy_primitives::hex::encode(actual),
            });
        }
        decode(args, &kinds(&self.inputs))
    }

    /// Decodes the return data of a call.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<AbiValue>, DecodeError> {
        decode(data, &kinds(&self.outputs))
    }

    /// Decodes `0x`-prefixed hex return data, as found in an `eth_call` response.
    pub fn decode_output_hex(&self, data: &str) -> Result<Vec<AbiValue>, DecodeError> {
        self.decode_output(&hex::decode_data(data)?)
    }
}

impl FromStr for Function {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::parse(s)
    }
}

fn kinds(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.kind.clone()).collect()
}

/// Splits a leading parenthesized group from `s`, returning its contents and the rest.
fn take_group(s: &str) -> Option<(&str, &str)> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..i], &s[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_params(list: &str) -> Option<Vec<Param>> {
    split_top_level(list)?
        .into_iter()
        .map(|part| {
            let part = part.trim();
            let (kind, name) = match part.rsplit_once(char::is_whitespace) {
                Some((kind, name)) if is_identifier(name) && !kind.trim().is_empty() => {
                    (kind.trim(), name)
                }
                _ => (part, ""),
            };
            Some(Param {
                name: name.to_string(),
                kind: kind.parse().ok()?,
            })
        })
        .collect()
}

fn is_identifier(s: &str) -> bool {
    validate_method_name(s).is_ok()
}

/// A contract method invocation: a name and its named, typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMethod {
    pub name: String,
    pub params: Vec<ContractParam>,
}

/// One argument of a [ContractMethod].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractParam {
    pub name: String,
    pub kind: ParamType,
    pub value: AbiValue,
}

impl ContractMethod {
    pub fn new(name: impl Into<String>) -> Self {
        ContractMethod {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn param(mut self, name: impl Into<String>, kind: ParamType, value: AbiValue) -> Self {
        self.params.push(ContractParam {
            name: name.into(),
            kind,
            value,
        });
        self
    }

    pub fn signature(&self) -> String {
        let types: Vec<String> = self.params.iter().map(|p| p.kind.to_string()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Encodes the selector followed by the arguments.
    pub fn call_data(&self) -> Result<Vec<u8>, EncodingError> {
        let args: Vec<(ParamType, AbiValue)> = self
            .params
            .iter()
            .map(|p| (p.kind.clone(), p.value.clone()))
            .collect();
        encode_call(&self.name, &args)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, U256};
    use hex_literal::hex;

    use super::*;

    #[test]
    fn parse_signatures() {
        let f = Function::parse("balanceOf(address owner)(uint256)").unwrap();
        assert_eq!(f.name, "balanceOf");
        assert_eq!(f.inputs[0].name, "owner");
        assert_eq!(f.inputs[0].kind, ParamType::Address);
        assert_eq!(f.outputs[0].kind, ParamType::Uint(256));
        assert_eq!(f.signature(), "balanceOf(address)");
        assert_eq!(f.selector(), hex!("70a08231"));

        let f: Function = "function transfer(address to, uint amount) returns (bool)"
            .parse()
            .unwrap();
        assert_eq!(f.signature(), "transfer(address,uint256)");
        assert_eq!(f.selector(), hex!("a9059cbb"));
        assert_eq!(f.outputs.len(), 1);

        let f = Function::parse("submit((uint256,bytes)[] batch, bool)").unwrap();
        assert_eq!(f.signature(), "submit((uint256,bytes)[],bool)");
        assert_eq!(f.inputs[0].name, "batch");
        assert!(f.outputs.is_empty());
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Function::parse("transfer"),
            Err(EncodingError::InvalidType(_))
        ));
        assert!(matches!(
            Function::parse("transfer(address"),
            Err(EncodingError::InvalidType(_))
        ));
        assert!(matches!(
            Function::parse("transfer(uint7)"),
            Err(EncodingError::InvalidType(_))
        ));
        assert!(matches!(
            Function::parse("2x(uint256)"),
            Err(EncodingError::InvalidMethodName(_))
        ));
    }

    #[test]
    fn input_roundtrip() {
        let f = Function::parse("transfer(address,uint256)").unwrap();
        let args = vec![
            AbiValue::from(address!("3535353535353535353535353535353535353535")),
            AbiValue::from(U256::from(10).pow(U256::from(18))),
        ];
        let data = f.encode_input(&args).unwrap();
        assert_eq!(&data[..4], &hex!("a9059cbb"));
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(f.decode_input(&data).unwrap(), args);

        let other = Function::parse("approve(address,uint256)").unwrap();
        assert!(matches!(
            other.decode_input(&data),
            Err(DecodeError::SelectorMismatch { .. })
        ));
        assert!(matches!(
            f.decode_input(&data[..3]),
            Err(DecodeError::BufferTooShort)
        ));
    }

    #[test]
    fn argument_count() {
        let f = Function::parse("transfer(address,uint256)").unwrap();
        assert_eq!(
            f.encode_input(&[AbiValue::from(1u64)]),
            Err(EncodingError::ArgumentCount {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn outputs() {
        let f = Function::parse("name()(string)").unwrap();
        let data = crate::abi::encode(&[AbiValue::from("Token")]);
        assert_eq!(
            f.decode_output(&data).unwrap(),
            vec![AbiValue::from("Token")]
        );
        let hex = hex::encode_data(&data);
        assert_eq!(f.decode_output_hex(&hex).unwrap()[0].as_str(), Some("Token"));
    }

    #[test]
    fn contract_method() {
        let method = ContractMethod::new("balanceOf").param(
            "owner",
            ParamType::Address,
            AbiValue::from(address!("f4053f6c8626f22398778267e46e0bf4179d78f6")),
        );
        assert_eq!(method.signature(), "balanceOf(address)");
        assert_eq!(
            method.call_data().unwrap(),
            hex!("70a08231000000000000000000000000f4053f6c8626f22398778267e46e0bf4179d78f6")
        );

        let bad = ContractMethod::new("ba lance");
        assert!(matches!(
            bad.call_data(),
            Err(EncodingError::InvalidMethodName(_))
        ));
    }
}
