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

use std::{collections::HashMap, sync::RwLock};

use alloy_primitives::Address;

use crate::error::KeyStoreError;

/// Storage for key material, keyed by account address.
///
/// The stored bytes are opaque: encrypting them before they reach the store is up to the
/// caller.
pub trait KeyStore: Send + Sync {
    /// Stores `key` for `address`, replacing any previous entry.
    fn store(&self, address: Address, key: Vec<u8>) -> Result<(), KeyStoreError>;
    fn retrieve(&self, address: &Address) -> Result<Vec<u8>, KeyStoreError>;
    fn remove(&self, address: &Address) -> Result<(), KeyStoreError>;
}

/// A [KeyStore] that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<Address, Vec<u8>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn store(&self, address: Address, key: Vec<u8>) -> Result<(), KeyStoreError> {
        self.keys
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address, key);
        Ok(())
    }

    fn retrieve(&self, address: &Address) -> Result<Vec<u8>, KeyStoreError> {
        self.keys
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(address)
            .cloned()
            .ok_or(KeyStoreError::NotFound(*address))
    }

    fn remove(&self, address: &Address) -> Result<(), KeyStoreError> {
        self.keys
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(address)
            .map(|_| ())
            .ok_or(KeyStoreError::NotFound(*address))
    }
}
