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

//! Legacy (pre-EIP-2718) transactions.
//!
//! An unsigned [Transaction] becomes a [SignedTransaction] exactly once, through
//! [Transaction::sign]. The signed value is immutable; reissuing requires building a new
//! [Transaction], typically with a fresh nonce.

use alloy_primitives::{Address, Bytes, ChainId, TxNumber, B256, U256};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DecodeError, TransactionError},
    hex::{decode_data, encode_data},
    keccak::keccak,
    rlp::{self, RlpItem},
    signature::Signature,
    signer::Account,
};

/// Represents the type of an Ethereum transaction: either a contract creation or a call
/// to an existing account.
///
/// It avoids using an [Option] for this purpose so that a creation is always encoded as
/// the empty string rather than being dropped from the field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Creates a new contract; the transaction data is the init code.
    #[default]
    Create,
    /// Calls, or transfers value to, the given address.
    Call(Address),
}

impl From<TransactionKind> for Option<Address> {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Create => None,
            TransactionKind::Call(addr) => Some(addr),
        }
    }
}

impl From<Option<Address>> for TransactionKind {
    fn from(value: Option<Address>) -> Self {
        value.map_or(TransactionKind::Create, TransactionKind::Call)
    }
}

impl From<TransactionKind> for RlpItem {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Call(addr) => addr.into(),
            TransactionKind::Create => RlpItem::empty(),
        }
    }
}

/// An unsigned legacy transaction, as detailed in
/// [EIP-155](https://eips.ethereum.org/EIPS/eip-155).
///
/// `nonce` and `chain_id` may be left empty until they have been queried from the node.
/// Signing requires a nonce; a transaction without a chain id is signed without replay
/// protection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// The network's chain ID introduced in EIP-155 to prevent replay attacks across
    /// different chains.
    pub chain_id: Option<ChainId>,
    /// The number of transactions previously sent by the sender.
    pub nonce: Option<TxNumber>,
    /// The price, in wei, the sender pays per unit of gas.
    pub gas_price: U256,
    /// The maximum amount of gas allocated for the transaction's execution.
    pub gas_limit: U256,
    /// The recipient, or [TransactionKind::Create] for contract creation.
    pub to: TransactionKind,
    /// The amount, in wei, transferred to the recipient.
    pub value: U256,
    /// Call data or contract init code.
    pub data: Bytes,
}

impl Transaction {
    /// A call to, or transfer to, `to`.
    pub fn call(to: Address) -> Self {
        Transaction {
            to: TransactionKind::Call(to),
            ..Default::default()
        }
    }

    /// A contract creation running `init_code`.
    pub fn create(init_code: impl Into<Bytes>) -> Self {
        Transaction {
            to: TransactionKind::Create,
            data: init_code.into(),
            ..Default::default()
        }
    }

    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_nonce(mut self, nonce: TxNumber) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    fn fields(&self, nonce: TxNumber) -> Vec<RlpItem> {
        vec![
            nonce.into(),
            self.gas_price.into(),
            self.gas_limit.into(),
            self.to.into(),
            self.value.into(),
            self.data.to_vec().into(),
        ]
    }

    /// Returns the RLP pre-image that is hashed for signing.
    ///
    /// According to EIP-155, if `chain_id` is present, `(chain_id, 0, 0)` is appended to
    /// the six transaction fields.
    pub fn signing_data(&self) -> Result<Vec<u8>, TransactionError> {
        let nonce = self.nonce.ok_or(TransactionError::MissingNonce)?;
        let mut fields = self.fields(nonce);
        if let Some(chain_id) = self.chain_id {
            fields.extend([chain_id.into(), 0u64.into(), 0u64.into()]);
        }
        Ok(rlp::encode(&RlpItem::List(fields))?)
    }

    /// Returns the Keccak-256 hash of [Transaction::signing_data].
    pub fn signing_hash(&self) -> Result<B256, TransactionError> {
        Ok(keccak(self.signing_data()?))
    }

    /// Signs the transaction, consuming it.
    pub fn sign(self, account: &Account) -> Result<SignedTransaction, TransactionError> {
        let signature = account.sign(&self.signing_data()?)?;
        let signature = match self.chain_id {
            Some(chain_id) => signature.with_eip155(chain_id),
            None => signature.to_legacy(),
        };
        let signed = SignedTransaction::from_parts(self, signature)?;
        debug!("signed transaction {} from {}", signed.hash(), account.address());
        Ok(signed)
    }
}

/// A signed legacy transaction, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    nonce: TxNumber,
    gas_price: U256,
    gas_limit: U256,
    to: TransactionKind,
    value: U256,
    data: Bytes,
    signature: Signature,
    raw: Bytes,
}

impl SignedTransaction {
    /// Combines `transaction` with a signature computed over its signing hash.
    ///
    /// The signature is taken as is; `v` must already be in its final form.
    pub fn from_parts(
        transaction: Transaction,
        signature: Signature,
    ) -> Result<Self, TransactionError> {
        let nonce = transaction.nonce.ok_or(TransactionError::MissingNonce)?;
        let mut fields = transaction.fields(nonce);
        fields.extend([
            signature.v.into(),
            // r and s are scalars here, so their leading zeros are dropped
            U256::from_be_bytes(signature.r.0).into(),
            U256::from_be_bytes(signature.s.0).into(),
        ]);
        let raw = rlp::encode(&RlpItem::List(fields))?;

        Ok(SignedTransaction {
            nonce,
            gas_price: transaction.gas_price,
            gas_limit: transaction.gas_limit,
            to: transaction.to,
            value: transaction.value,
            data: transaction.data,
            signature,
            raw: raw.into(),
        })
    }

    /// Parses a raw signed legacy transaction.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let item = rlp::decode(raw)?;
        let fields = item.as_list()?;
        let [nonce, gas_price, gas_limit, to, value, data, v, r, s] = fields else {
            return Err(DecodeError::InvalidTransaction("expected 9 fields"));
        };
        let to = match to.as_bytes()? {
            [] => TransactionKind::Create,
            addr if addr.len() == 20 => {
                TransactionKind::Call(Address::from_slice(addr))
            }
            _ => return Err(DecodeError::InvalidTransaction("invalid recipient")),
        };
        let signature = Signature {
            v: v.as_u64()?,
            r: r.as_u256()?.to_be_bytes::<32>().into(),
            s: s.as_u256()?.to_be_bytes::<32>().into(),
        };
        // raw recovery ids never appear on the wire
        if !matches!(signature.v, 27 | 28 | 35..=u64::MAX) {
            return Err(DecodeError::InvalidTransaction("invalid v"));
        }

        Ok(SignedTransaction {
            nonce: nonce.as_u64()?,
            gas_price: gas_price.as_u256()?,
            gas_limit: gas_limit.as_u256()?,
            to,
            value: value.as_u256()?,
            data: data.as_bytes()?.to_vec().into(),
            signature,
            raw: raw.to_vec().into(),
        })
    }

    /// Parses a `0x`-prefixed hex raw transaction.
    pub fn decode_hex(raw: &str) -> Result<Self, DecodeError> {
        Self::decode(&decode_data(raw)?)
    }

    /// The RLP encoding of the nine signed fields.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// The broadcast payload for `eth_sendRawTransaction`.
    pub fn raw_hex(&self) -> String {
        encode_data(&self.raw)
    }

    /// The transaction hash.
    pub fn hash(&self) -> B256 {
        keccak(&self.raw)
    }

    pub fn nonce(&self) -> TxNumber {
        self.nonce
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    pub fn to(&self) -> TransactionKind {
        self.to
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The chain id bound into the signature, `None` for unprotected transactions.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.signature.chain_id()
    }

    /// Returns a copy of the unsigned fields with the nonce cleared, for reissuing.
    pub fn into_unsigned(self) -> Transaction {
        Transaction {
            chain_id: self.chain_id(),
            nonce: None,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: self.to,
            value: self.value,
            data: self.data,
        }
    }

    /// Recovers the address of the sender.
    pub fn recover_signer(&self) -> Result<Address, TransactionError> {
        let unsigned = Transaction {
            chain_id: self.chain_id(),
            nonce: Some(self.nonce),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
        };
        Ok(self.signature.recover(&unsigned.signing_hash()?)?)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256, bytes};
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;
    use crate::error::SigningError;

    /// The example transaction from EIP-155.
    fn eip155_example() -> Transaction {
        Transaction::call(address!("3535353535353535353535353535353535353535"))
            .with_nonce(9)
            .with_gas_price(U256::from(20_000_000_000u64))
            .with_gas_limit(U256::from(21000))
            .with_value(U256::from(1_000_000_000_000_000_000u64))
            .with_chain_id(1)
    }

    #[test]
    fn eip155_signing_data() {
        let tx = eip155_example();
        assert_eq!(
            tx.signing_data().unwrap(),
            hex!("ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080")
        );
        assert_eq!(
            tx.signing_hash().unwrap(),
            b256!("daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53")
        );
    }

    #[test]
    fn eip155_sign() {
        let account = Account::from_private_key(&[0x46; 32]).unwrap();
        let signed = eip155_example().sign(&account).unwrap();

        assert_eq!(signed.signature().v, 37);
        assert_eq!(signed.chain_id(), Some(1));
        assert_eq!(
            signed.raw_hex(),
            "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert_eq!(
            signed.hash(),
            b256!("33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788")
        );
        assert_eq!(signed.recover_signer().unwrap(), account.address());
    }

    #[test]
    fn serde_roundtrip() {
        let tx = eip155_example().with_data(bytes!("70a08231"));
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["nonce"], serde_json::json!(9));
        assert_eq!(json["chain_id"], serde_json::json!(1));
        assert_eq!(json["data"], serde_json::json!("0x70a08231"));
        assert_eq!(serde_json::from_value::<Transaction>(json).unwrap(), tx);

        let create = Transaction::create(bytes!("6080604052"));
        let json = serde_json::to_string(&create).unwrap();
        assert_eq!(serde_json::from_str::<Transaction>(&json).unwrap(), create);
    }

    #[test]
    fn unsigned_and_signed_differ_in_trailer_only() {
        let account = Account::from_private_key(&[0x46; 32]).unwrap();
        let tx = eip155_example();
        let unsigned = rlp::decode(&tx.signing_data().unwrap()).unwrap();
        let signed = tx.sign(&account).unwrap();
        let signed = rlp::decode(signed.raw()).unwrap();
        assert_eq!(unsigned.as_list().unwrap()[..6], signed.as_list().unwrap()[..6]);
        assert_eq!(unsigned.as_list().unwrap()[6].as_u64().unwrap(), 1);
    }

    #[test]
    fn missing_nonce() {
        let account = Account::random();
        let tx = Transaction::call(Address::ZERO).with_chain_id(1);
        assert!(matches!(
            tx.signing_data(),
            Err(TransactionError::MissingNonce)
        ));
        assert!(matches!(
            tx.sign(&account),
            Err(TransactionError::MissingNonce)
        ));
    }

    #[test]
    fn unprotected_signature() {
        let account = Account::from_private_key(&[0x46; 32]).unwrap();
        let tx = Transaction {
            chain_id: None,
            ..eip155_example()
        };
        // six fields, no chain id trailer
        assert_eq!(rlp::decode(&tx.signing_data().unwrap()).unwrap().as_list().unwrap().len(), 6);
        let signed = tx.sign(&account).unwrap();
        assert!(matches!(signed.signature().v, 27 | 28));
        assert_eq!(signed.chain_id(), None);
        assert_eq!(signed.recover_signer().unwrap(), account.address());
    }

    #[test]
    fn contract_creation() {
        let account = Account::from_private_key(&[0x46; 32]).unwrap();
        let signed = Transaction::create(bytes!("6080604052"))
            .with_nonce(0)
            .with_gas_limit(U256::from(100_000))
            .with_chain_id(5)
            .sign(&account)
            .unwrap();
        let decoded = rlp::decode(signed.raw()).unwrap();
        // `to` is the empty string
        assert_eq!(decoded.as_list().unwrap()[3], RlpItem::empty());
        assert_eq!(signed.to(), TransactionKind::Create);
        assert_eq!(signed.chain_id(), Some(5));

        let roundtrip = SignedTransaction::decode(signed.raw()).unwrap();
        assert_eq!(roundtrip, signed);
    }

    #[test]
    fn scalars_drop_leading_zeros() {
        let signature = Signature::new(
            37,
            b256!("00ff000000000000000000000000000000000000000000000000000000000001"),
            b256!("0000000000000000000000000000000000000000000000000000000000000002"),
        );
        let signed = SignedTransaction::from_parts(eip155_example(), signature).unwrap();
        let raw = signed.raw();
        // r: 31-byte string, s: single byte
        assert_eq!(raw[raw.len() - 33], 0x9f);
        assert_eq!(raw[raw.len() - 1], 0x02);

        let decoded = SignedTransaction::decode(raw).unwrap();
        assert_eq!(decoded.signature(), &signature);
    }

    #[test]
    fn decode_legacy() {
        let raw = hex!("f86780862d79883d2000825208945df9b87991262f6ba471f09758cde1c0fc1de734827a69801ca088ff6cf0fefd94db46111149ae4bfc179e9b94721fffd821d38d16464b3f71d0a045e0aff800961cfce805daef7016b9b675c137a6a41a548f7b60a3484c06a33a");
        let tx = SignedTransaction::decode(&raw).unwrap();
        assert_eq!(tx.nonce(), 0);
        assert_eq!(tx.signature().v, 28);
        assert_eq!(tx.chain_id(), None);
        assert_eq!(
            tx.to(),
            TransactionKind::Call(address!("5df9b87991262f6ba471f09758cde1c0fc1de734"))
        );
        assert_eq!(tx.value(), U256::from(31337));
        assert_eq!(
            tx.hash(),
            b256!("5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060")
        );
        assert_eq!(
            tx.recover_signer().unwrap(),
            address!("a1e4380a3b1f749673e270229993ee55f35663b4")
        );

        // re-encoding the decoded fields reproduces the input
        let reencoded =
            SignedTransaction::from_parts(tx.clone().into_unsigned().with_nonce(0), *tx.signature())
                .unwrap();
        assert_eq!(reencoded.raw().to_vec(), raw.to_vec());
    }

    #[test]
    fn decode_eip155() {
        let raw = "0xf870830834a08503c49bfa0483019a2894f0ee707731d1be239f9f482e1b2ea5384c0c426f8806df842eaa9fb8008026a0cadd790a37b78e5613c8cf44dc3002e3d7f06a5325d045963c708efe3f9fdf7aa01f63adb9a2d5e020c6aa0ff64695e25d7d9a780ed8471abe716d2dc0bf7d4259";
        let tx = SignedTransaction::decode_hex(raw).unwrap();
        assert_eq!(tx.nonce(), 0x0834a0);
        assert_eq!(tx.signature().v, 38);
        assert_eq!(tx.chain_id(), Some(1));
        assert_eq!(tx.raw_hex(), raw);
        assert_eq!(
            tx.hash(),
            b256!("4540eb9c46b1654c26353ac3c65e56451f711926982ce1b02f15c50e7459caf7")
        );
        assert_eq!(
            tx.recover_signer().unwrap(),
            address!("974caa59e49682cda0ad2bbe82983419a2ecc400")
        );

        let unsigned = tx.into_unsigned();
        assert_eq!(unsigned.nonce, None);
        assert_eq!(unsigned.chain_id, Some(1));
    }

    #[test]
    fn decode_rejects_malformed() {
        // eight fields
        let eight = rlp::encode(&RlpItem::List(vec![RlpItem::empty(); 8])).unwrap();
        assert!(matches!(
            SignedTransaction::decode(&eight),
            Err(DecodeError::InvalidTransaction(_))
        ));
        // 19-byte recipient
        let mut fields = vec![RlpItem::empty(); 9];
        fields[3] = RlpItem::Bytes(vec![0x11; 19]);
        fields[6] = 27u64.into();
        let bad_to = rlp::encode(&RlpItem::List(fields)).unwrap();
        assert!(matches!(
            SignedTransaction::decode(&bad_to),
            Err(DecodeError::InvalidTransaction("invalid recipient"))
        ));
        // typed transaction envelope
        assert!(SignedTransaction::decode(&hex!("02c0")).is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(26)]
    #[case(29)]
    #[case(34)]
    fn decode_rejects_v_outside_legacy_and_eip155_range(#[case] v: u64) {
        let mut fields = vec![RlpItem::empty(); 9];
        fields[6] = v.into();
        let raw = rlp::encode(&RlpItem::List(fields)).unwrap();
        assert!(matches!(
            SignedTransaction::decode(&raw),
            Err(DecodeError::InvalidTransaction("invalid v"))
        ));
    }

    #[test]
    fn recover_with_zero_signature_fails() {
        let mut fields = vec![RlpItem::empty(); 9];
        fields[6] = 27u64.into();
        let raw = rlp::encode(&RlpItem::List(fields)).unwrap();
        let tx = SignedTransaction::decode(&raw).unwrap();
        assert!(matches!(
            tx.recover_signer(),
            Err(TransactionError::Signing(SigningError::InvalidSignature(_)))
        ));
    }
}
