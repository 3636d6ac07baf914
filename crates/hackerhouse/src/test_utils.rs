// Copyright 2026 Boundless Foundation, Inc.
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

//! In-memory chain used to drive readers, submitters and puzzles in tests.

#![allow(missing_docs)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::{
    primitives::{Address, Bytes, TxHash, B256, U256},
    transports::{TransportError, TransportErrorKind},
};
use async_trait::async_trait;

use crate::{
    reader::ChainReader,
    submitter::{Confirmation, SubmitError, TxRequest, TxSubmitter},
};

type ViewFn = Arc<dyn Fn(&[u8]) -> Option<Bytes> + Send + Sync>;
type SendHook = Arc<dyn Fn(&TxRequest, &mut MockStorage) + Send + Sync>;

/// Raw storage of the mock chain, keyed by contract address and slot.
pub type MockStorage = HashMap<(Address, U256), B256>;

/// Network operations observed by the mock, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockEvent {
    Call(Address),
    StorageRead(Address, U256),
    Sent(TxHash),
    Waited(TxHash),
}

#[derive(Default)]
struct State {
    storage: MockStorage,
    events: Vec<MockEvent>,
    view_calls: Vec<(Address, Bytes)>,
    sent: Vec<TxRequest>,
    next_hashes: VecDeque<TxHash>,
    nonce: u64,
}

/// Both a [ChainReader] and a [TxSubmitter], answering from memory.
#[derive(Clone)]
pub struct MockChain {
    sender: Address,
    views: HashMap<Address, ViewFn>,
    send_hook: Option<SendHook>,
    offline: bool,
    reject_reason: Option<String>,
    reverting: bool,
    confirming: bool,
    state: Arc<Mutex<State>>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            sender: Address::repeat_byte(0xee),
            views: HashMap::new(),
            send_hook: None,
            offline: false,
            reject_reason: None,
            reverting: false,
            confirming: true,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Answers every `eth_call` to `address` with `view`. `None` answers with empty return data,
    /// like an address without code.
    pub fn with_view(
        mut self,
        address: Address,
        view: impl Fn(&[u8]) -> Option<Bytes> + Send + Sync + 'static,
    ) -> Self {
        self.views.insert(address, Arc::new(view));
        self
    }

    pub fn with_storage(self, address: Address, slot: U256, word: B256) -> Self {
        self.state.lock().unwrap().storage.insert((address, slot), word);
        self
    }

    /// Hashes handed out by the next sends, before falling back to generated ones.
    pub fn with_next_tx_hashes(self, hashes: impl IntoIterator<Item = TxHash>) -> Self {
        self.state.lock().unwrap().next_hashes.extend(hashes);
        self
    }

    /// Runs `hook` against the storage for every accepted transaction, to model its effects.
    pub fn on_send(mut self, hook: impl Fn(&TxRequest, &mut MockStorage) + Send + Sync + 'static) -> Self {
        self.send_hook = Some(Arc::new(hook));
        self
    }

    /// Fails every request as if the endpoint were unreachable.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Rejects every send with `reason`.
    pub fn rejecting(mut self, reason: &str) -> Self {
        self.reject_reason = Some(reason.to_string());
        self
    }

    /// Includes every transaction with a failed status.
    pub fn reverting(mut self) -> Self {
        self.reverting = true;
        self
    }

    /// Never reports inclusion.
    pub fn never_confirming(mut self) -> Self {
        self.confirming = false;
        self
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|event| matches!(event, MockEvent::Sent(_) | MockEvent::Waited(_)))
            .cloned()
            .collect()
    }

    /// Every network operation, reads included.
    pub fn all_events(&self) -> Vec<MockEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn view_calls(&self) -> Vec<(Address, Bytes)> {
        self.state.lock().unwrap().view_calls.clone()
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    fn unreachable() -> TransportError {
        TransportErrorKind::custom_str("connection refused")
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, TransportError> {
        if self.offline {
            return Err(Self::unreachable());
        }
        {
            let mut state = self.state.lock().unwrap();
            state.events.push(MockEvent::Call(to));
            state.view_calls.push((to, calldata.clone()));
        }
        Ok(self.views.get(&to).and_then(|view| view(&calldata)).unwrap_or_default())
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<B256, TransportError> {
        if self.offline {
            return Err(Self::unreachable());
        }
        let mut state = self.state.lock().unwrap();
        state.events.push(MockEvent::StorageRead(address, slot));
        Ok(state.storage.get(&(address, slot)).copied().unwrap_or_default())
    }
}

#[async_trait]
impl TxSubmitter for MockChain {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn send(&self, request: TxRequest) -> Result<TxHash, SubmitError> {
        if self.offline {
            return Err(SubmitError::Connectivity(Self::unreachable().into()));
        }
        if let Some(reason) = &self.reject_reason {
            return Err(SubmitError::Rejected { reason: reason.clone() });
        }

        let mut state = self.state.lock().unwrap();
        state.nonce += 1;
        let nonce = state.nonce;
        let tx_hash = state
            .next_hashes
            .pop_front()
            .unwrap_or_else(|| B256::left_padding_from(&nonce.to_be_bytes()));

        if let Some(hook) = &self.send_hook {
            hook(&request, &mut state.storage);
        }
        state.sent.push(request);
        state.events.push(MockEvent::Sent(tx_hash));
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError> {
        let block_number = {
            let mut state = self.state.lock().unwrap();
            state.events.push(MockEvent::Waited(tx_hash));
            state.nonce
        };
        if !self.confirming {
            return Err(SubmitError::ConfirmationTimeout {
                tx_hash,
                timeout: Duration::from_secs(1),
            });
        }

        Ok(Confirmation {
            block_number: Some(block_number),
            block_hash: Some(B256::repeat_byte(0xbb)),
            gas_used: 21_000,
            status: !self.reverting,
        })
    }
}
