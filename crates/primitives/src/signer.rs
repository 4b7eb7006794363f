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

//! Accounts and the secp256k1 signing engine.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, B256};
use k256::{
    ecdsa::{SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey,
};
use log::trace;
use rand_core::OsRng;

use crate::{
    error::{KeyError, SigningError},
    hex::decode_data,
    keccak::keccak,
    signature::Signature,
};

/// A secp256k1 key pair together with its derived Ethereum address.
///
/// The public key and address are derived once from the private key and cannot be set
/// independently. The private key is zeroized when the account is dropped.
#[derive(Clone)]
pub struct Account {
    signing_key: SigningKey,
    public_key: [u8; 64],
    address: Address,
}

impl Account {
    /// Imports a raw 32-byte private key.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self, KeyError> {
        // `SigningKey::from_slice` left-pads shorter inputs
        if private_key.len() != 32 {
            return Err(KeyError::InvalidPrivateKey);
        }
        let signing_key =
            SigningKey::from_slice(private_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Imports a hex-encoded private key, with or without `0x` prefix.
    pub fn from_hex(private_key: &str) -> Result<Self, KeyError> {
        let bytes = decode_data(private_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_private_key(&bytes)
    }

    /// Generates a fresh key from the operating system's CSPRNG.
    pub fn random() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = uncompressed_public_key(signing_key.verifying_key());
        let address = public_key_to_address(&public_key);
        Account {
            signing_key,
            public_key,
            address,
        }
    }

    pub fn private_key(&self) -> B256 {
        B256::from_slice(&self.signing_key.to_bytes())
    }

    /// The uncompressed public key `x || y`, without the SEC1 `0x04` tag.
    pub fn public_key(&self) -> &[u8; 64] {
        &self.public_key
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs the Keccak-256 hash of `message`.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, SigningError> {
        self.sign_hash(&keccak(message))
    }

    /// Signs a 32-byte digest.
    ///
    /// The signature is deterministic (RFC 6979) and has a low `s`. Its `v` holds the raw
    /// recovery id, 0 or 1.
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature, SigningError> {
        trace!("signing {hash} with {}", self.address);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|_| SigningError::SignatureCreationFailed)?;
        // an x-reduced id cannot be expressed in `v`
        if recovery_id.is_x_reduced() {
            return Err(SigningError::SignatureCreationFailed);
        }
        let bytes = signature.to_bytes();
        Ok(Signature {
            v: recovery_id.is_y_odd() as u64,
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..]),
        })
    }

    /// Signs `message` with the EIP-191 `personal_sign` prefix; `v` is `27 + recovery_id`.
    pub fn sign_personal_message(&self, message: &[u8]) -> Result<Signature, SigningError> {
        Ok(self.sign_hash(&personal_message_hash(message))?.to_legacy())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl FromStr for Account {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Account::from_hex(s)
    }
}

/// Signs the Keccak-256 hash of `message` with a raw 32-byte private key.
pub fn sign(message: &[u8], private_key: &[u8]) -> Result<Signature, SigningError> {
    Account::from_private_key(private_key)?.sign(message)
}

/// The hash signed by `personal_sign`:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
pub fn personal_message_hash(message: &[u8]) -> B256 {
    let mut data = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    data.extend_from_slice(message);
    keccak(data)
}

/// Derives the address of an uncompressed public key.
pub fn public_key_to_address(public_key: &[u8; 64]) -> Address {
    Address::from_slice(&keccak(public_key)[12..])
}

pub(crate) fn verifying_key_to_address(verifying_key: &VerifyingKey) -> Address {
    public_key_to_address(&uncompressed_public_key(verifying_key))
}

fn uncompressed_public_key(verifying_key: &VerifyingKey) -> [u8; 64] {
    let point = PublicKey::from(verifying_key).to_encoded_point(false);
    let bytes = point.as_bytes();
    debug_assert_eq!(bytes[0], 0x04);
    let mut public_key = [0u8; 64];
    public_key.copy_from_slice(&bytes[1..]);
    public_key
}
