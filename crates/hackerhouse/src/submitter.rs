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

//! Signing, broadcasting and confirming state-changing transactions.

use std::time::Duration;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, B256, U256},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::SolCall,
    transports::TransportError,
};
use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;

use crate::{
    errors::{CodedError, ErrorKind},
    impl_coded_debug,
    reader::revert_reason,
};

/// Default time to wait for a transaction to be included.
pub const DEFAULT_TX_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error)]
pub enum SubmitError {
    #[error("{code} Transaction rejected: {reason}", code = self.code())]
    Rejected { reason: String },

    #[error("{code} Transaction {tx_hash:#x} reverted", code = self.code())]
    Reverted { tx_hash: TxHash },

    #[error("{code} Transaction {tx_hash:#x} not confirmed within {timeout:?}", code = self.code())]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },

    #[error("{code} RPC request failed: {0:#}", code = self.code())]
    Connectivity(#[source] anyhow::Error),
}

impl_coded_debug!(SubmitError);

impl CodedError for SubmitError {
    fn code(&self) -> &str {
        match self {
            SubmitError::Rejected { .. } => "[HH-TX-001]",
            SubmitError::Reverted { .. } => "[HH-TX-002]",
            SubmitError::ConfirmationTimeout { .. } => "[HH-TX-003]",
            SubmitError::Connectivity(_) => "[HH-TX-501]",
        }
    }
}

impl SubmitError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Rejected { .. } | SubmitError::Reverted { .. } => ErrorKind::Submission,
            SubmitError::ConfirmationTimeout { .. } => ErrorKind::ConfirmationTimeout,
            SubmitError::Connectivity(_) => ErrorKind::Connectivity,
        }
    }

    /// Error responses from the node are rejections, carrying the revert reason when the node
    /// returned revert data. Anything else means the node could not be reached.
    pub fn from_transport(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => SubmitError::Rejected {
                reason: revert_reason(payload).unwrap_or_else(|| payload.message.to_string()),
            },
            None => SubmitError::Connectivity(
                anyhow::Error::new(err).context("Failed to send transaction"),
            ),
        }
    }
}

/// A state-changing transaction before signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    /// Call payload. `None` sends a bare value transfer.
    pub input: Option<Bytes>,
    pub value: U256,
}

impl TxRequest {
    /// A call to `to` with the ABI encoding of `call` as payload.
    pub fn call<C: SolCall>(to: Address, call: &C) -> Self {
        Self { to, input: Some(call.abi_encode().into()), value: U256::ZERO }
    }

    /// A transfer with an empty payload, which lands in the receive or fallback function of `to`.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self { to, input: None, value }
    }

    /// The 4-byte selector of the payload, if any.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.input.as_ref().and_then(|input| input.get(..4)).and_then(|s| s.try_into().ok())
    }
}

/// Inclusion details of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    pub gas_used: u64,
    /// `false` if execution reverted.
    pub status: bool,
}

impl From<&TransactionReceipt> for Confirmation {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            gas_used: receipt.gas_used,
            status: receipt.status(),
        }
    }
}

/// A submitted and confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRecord {
    pub tx_hash: TxHash,
    pub confirmation: Confirmation,
}

/// Signs and broadcasts transactions on behalf of one signing identity.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    /// Address of the signing identity.
    fn sender(&self) -> Address;

    /// Signs and broadcasts `request`, returning the hash of the pending transaction.
    async fn send(&self, request: TxRequest) -> Result<TxHash, SubmitError>;

    /// Waits until the transaction `tx_hash` is included.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError>;
}

/// Sends `request` and waits for its inclusion.
///
/// The wait only starts once the node accepted the transaction. A transaction that was included
/// but reverted is reported as [SubmitError::Reverted].
pub async fn submit<S>(submitter: &S, request: TxRequest) -> Result<TxRecord, SubmitError>
where
    S: TxSubmitter + ?Sized,
{
    let to = request.to;
    let tx_hash = submitter.send(request).await?;
    tracing::info!("Submitted transaction {tx_hash:#x} to {to}");

    let confirmation = submitter.wait_for_receipt(tx_hash).await?;
    if !confirmation.status {
        return Err(SubmitError::Reverted { tx_hash });
    }
    tracing::info!(
        "Transaction {tx_hash:#x} confirmed in block {:?}, gas used {}",
        confirmation.block_number,
        confirmation.gas_used
    );

    Ok(TxRecord { tx_hash, confirmation })
}

/// [TxSubmitter] backed by an alloy [Provider] that holds a wallet.
#[derive(Clone, Debug)]
pub struct RpcTxSubmitter<P> {
    provider: P,
    sender: Address,
    confirmations: u64,
    timeout: Duration,
}

impl<P> RpcTxSubmitter<P> {
    /// `provider` must sign for `sender`, e.g. one built with `ProviderBuilder::wallet`.
    pub fn new(provider: P, sender: Address) -> Self {
        Self { provider, sender, confirmations: 1, timeout: DEFAULT_TX_TIMEOUT }
    }

    pub fn with_confirmations(self, confirmations: u64) -> Self {
        Self { confirmations, ..self }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

#[async_trait]
impl<P> TxSubmitter for RpcTxSubmitter<P>
where
    P: Provider<Ethereum> + Send + Sync,
{
    fn sender(&self) -> Address {
        self.sender
    }

    async fn send(&self, request: TxRequest) -> Result<TxHash, SubmitError> {
        let mut tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(request.to)
            .with_value(request.value);
        if let Some(input) = request.input {
            tx = tx.with_input(input);
        }

        let pending = self.provider.send_transaction(tx).await.map_err(SubmitError::from_transport)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Confirmation, SubmitError> {
        let pending = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations);

        let receipt = tokio::time::timeout(self.timeout, pending.get_receipt())
            .await
            .map_err(|_| SubmitError::ConfirmationTimeout { tx_hash, timeout: self.timeout })?
            .with_context(|| format!("Failed to get receipt for transaction {tx_hash:#x}"))
            .map_err(SubmitError::Connectivity)?;

        Ok(Confirmation::from(&receipt))
    }
}
