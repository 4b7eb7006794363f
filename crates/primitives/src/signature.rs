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

use alloy_primitives::{Address, ChainId, B256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey as K256VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::{error::SigningError, signer::verifying_key_to_address};

/// Smallest EIP-155 `v`: chain id 0, recovery id 0.
const MIN_EIP155_V: u64 = 35;

/// A recoverable secp256k1 signature.
///
/// `r` and `s` are kept as fixed-width 32-byte big-endian scalars. `v` holds one of:
/// the raw recovery id (0 or 1) straight out of the signer, the pre-EIP-155 form
/// `27 + recovery_id`, or the EIP-155 form `recovery_id + chain_id * 2 + 35`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub v: u64,
    pub r: B256,
    pub s: B256,
}

impl Signature {
    pub const fn new(v: u64, r: B256, s: B256) -> Self {
        Signature { v, r, s }
    }

    /// Folds `chain_id` into `v` following EIP-155.
    ///
    /// The transform is applied at most once: a signature whose `v` already carries a
    /// chain id (`v >= 35`, chain id 0 included) or a malformed `v` is returned unchanged.
    pub fn with_eip155(self, chain_id: ChainId) -> Self {
        if self.v >= MIN_EIP155_V {
            return self;
        }
        let Some(recovery_id) = self.recovery_id() else {
            return self;
        };
        let v = chain_id
            .saturating_mul(2)
            .saturating_add(35)
            .saturating_add(recovery_id as u64);
        Signature { v, ..self }
    }

    /// Returns the pre-EIP-155 form, `v = 27 + recovery_id`.
    pub fn to_legacy(self) -> Self {
        match self.recovery_id() {
            Some(recovery_id) => Signature {
                v: 27 + recovery_id as u64,
                ..self
            },
            None => self,
        }
    }

    /// Returns the recovery id encoded in `v`, if `v` is well-formed.
    pub fn recovery_id(&self) -> Option<u8> {
        match self.v {
            0 | 1 => Some(self.v as u8),
            27 | 28 => Some((self.v - 27) as u8),
            v @ 35..=u64::MAX => Some(((v - 35) % 2) as u8),
            _ => None,
        }
    }

    /// Returns the chain id encoded in `v`, if any.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self.v {
            // EIP-155 encodes the chain_id in the V value
            value @ 35..=u64::MAX => Some((value - 35) / 2),
            _ => None,
        }
    }

    /// Recovers the address of the key that signed `hash`.
    pub fn recover(&self, hash: &B256) -> Result<Address, SigningError> {
        let recovery_id = self
            .recovery_id()
            .ok_or(SigningError::InvalidSignature("v invalid"))?;
        let signature = K256Signature::from_scalars(self.r.0, self.s.0)
            .map_err(|_| SigningError::InvalidSignature("r, s invalid"))?;

        let verify_key = K256VerifyingKey::recover_from_prehash(
            hash.as_slice(),
            &signature,
            RecoveryId::new(recovery_id == 1, false),
        )
        .map_err(|_| SigningError::InvalidSignature("recovery failed"))?;

        Ok(verifying_key_to_address(&verify_key))
    }

    /// Returns the 65-byte `r || s || v` form with `v` as `27 + recovery_id`.
    pub fn as_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.to_legacy().v as u8;
        out
    }

    /// Parses the 65-byte `r || s || v` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SigningError> {
        if bytes.len() != 65 {
            return Err(SigningError::InvalidSignature("expected 65 bytes"));
        }
        Ok(Signature {
            v: bytes[64] as u64,
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
        })
    }
}
