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

//! Read-only access to contract state: view calls and raw storage slots.

use std::str::FromStr;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, B256, U256},
    providers::Provider,
    rpc::{json_rpc::ErrorPayload, types::TransactionRequest},
    sol_types::{decode_revert_reason, Revert, SolCall, SolError},
    transports::TransportError,
};
use async_trait::async_trait;
use thiserror::Error;

use crate::{
    errors::{CodedError, ErrorKind},
    impl_coded_debug,
};

#[derive(Error)]
pub enum ReadError {
    #[error("{code} RPC request failed: {0}", code = self.code())]
    Connectivity(#[source] TransportError),

    #[error("{code} Failed to decode the return data of {function}: {source}", code = self.code())]
    Decode {
        function: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },

    #[error("{code} Call to {function} failed: {reason}", code = self.code())]
    CallFailed { function: &'static str, reason: String },
}

impl_coded_debug!(ReadError);

impl CodedError for ReadError {
    fn code(&self) -> &str {
        match self {
            ReadError::Connectivity(_) => "[HH-RD-501]",
            ReadError::Decode { .. } => "[HH-RD-001]",
            ReadError::CallFailed { .. } => "[HH-RD-002]",
        }
    }
}

impl ReadError {
    /// Classification of this error.
    ///
    /// A view call that reverts is reported as a decode failure: the fragment does not describe
    /// what is deployed at the address.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadError::Connectivity(_) => ErrorKind::Connectivity,
            ReadError::Decode { .. } | ReadError::CallFailed { .. } => ErrorKind::Decode,
        }
    }

    /// Only execution reverts count as a failed call. Any other error response (rate limits,
    /// unknown blocks, internal errors) means the endpoint did not serve the request.
    pub fn from_call(function: &'static str, err: TransportError) -> Self {
        match err.as_error_resp().and_then(revert_reason) {
            Some(reason) => ReadError::CallFailed { function, reason },
            None => ReadError::Connectivity(err),
        }
    }
}

/// Reason of an execution revert reported in a JSON-RPC error response.
///
/// `None` if the response does not describe a revert.
pub(crate) fn revert_reason(payload: &ErrorPayload) -> Option<String> {
    let decoded = payload
        .data
        .as_ref()
        .and_then(|data| Bytes::from_str(data.get().trim_matches('"')).ok())
        .and_then(|data| {
            Revert::abi_decode(&data)
                .map(|revert| revert.reason)
                .ok()
                .or_else(|| decode_revert_reason(&data))
        });
    match decoded {
        Some(reason) => Some(reason),
        None if payload.code == 3 || payload.message.starts_with("execution reverted") => {
            Some(payload.message.to_string())
        }
        None => None,
    }
}

/// Read-only view of the chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Executes `calldata` against `to` with `eth_call` at the latest block.
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, TransportError>;

    /// Reads the raw 32-byte word stored at `slot` of `address`.
    async fn storage_at(&self, address: Address, slot: U256) -> Result<B256, TransportError>;
}

/// Calls a view function described by an interface fragment and decodes its return value.
pub async fn read_view<R, C>(reader: &R, to: Address, call: &C) -> Result<C::Return, ReadError>
where
    R: ChainReader + ?Sized,
    C: SolCall,
{
    let data = reader
        .call(to, call.abi_encode().into())
        .await
        .map_err(|err| ReadError::from_call(C::SIGNATURE, err))?;
    tracing::trace!("{} on {to} returned {data}", C::SIGNATURE);

    C::abi_decode_returns(&data)
        .map_err(|source| ReadError::Decode { function: C::SIGNATURE, source })
}

/// Reads a raw storage slot.
pub async fn read_slot<R>(reader: &R, address: Address, slot: U256) -> Result<B256, ReadError>
where
    R: ChainReader + ?Sized,
{
    let word = reader.storage_at(address, slot).await.map_err(ReadError::Connectivity)?;
    tracing::trace!("Slot {slot} of {address}: {word}");
    Ok(word)
}

/// Reads a raw storage slot and reinterprets the word as an unsigned integer.
pub async fn read_slot_u256<R>(reader: &R, address: Address, slot: U256) -> Result<U256, ReadError>
where
    R: ChainReader + ?Sized,
{
    Ok(word_to_u256(read_slot(reader, address, slot).await?))
}

/// Reads a raw storage slot holding an address.
pub async fn read_slot_address<R>(
    reader: &R,
    address: Address,
    slot: U256,
) -> Result<Address, ReadError>
where
    R: ChainReader + ?Sized,
{
    Ok(word_to_address(read_slot(reader, address, slot).await?))
}

/// Big-endian interpretation of a storage word.
pub fn word_to_u256(word: B256) -> U256 {
    U256::from_be_bytes(word.0)
}

/// Addresses are right-aligned in their slot; the upper 12 bytes are dropped.
pub fn word_to_address(word: B256) -> Address {
    Address::from_word(word)
}

/// [ChainReader] backed by an alloy [Provider].
#[derive(Clone, Debug)]
pub struct RpcChainReader<P> {
    provider: P,
}

impl<P> RpcChainReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> ChainReader for RpcChainReader<P>
where
    P: Provider<Ethereum> + Send + Sync,
{
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, TransportError> {
        let tx = TransactionRequest::default().with_to(to).with_input(calldata);
        self.provider.call(tx).await
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<B256, TransportError> {
        let value = self.provider.get_storage_at(address, slot).await?;
        Ok(B256::from(value.to_be_bytes::<32>()))
    }
}
