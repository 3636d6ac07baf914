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

//! Command line configuration of the endpoint, the signing identity and the submission policy.

use std::{num::ParseIntError, time::Duration};

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use clap::Args;
use url::Url;

use crate::{
    errors::PuzzleError,
    reader::{ReadError, RpcChainReader},
    runner::{ChainContext, Endpoint},
    scanner::DEFAULT_MAX_ATTEMPTS,
    submitter::RpcTxSubmitter,
};

/// Context of a run against a live endpoint.
pub type RpcContext = ChainContext<RpcChainReader<DynProvider>, RpcTxSubmitter<DynProvider>>;

fn parse_seconds(arg: &str) -> Result<Duration, ParseIntError> {
    Ok(Duration::from_secs(arg.parse()?))
}

/// The node to talk to.
#[derive(Args, Debug, Clone)]
pub struct EndpointConfig {
    /// URL of the Ethereum RPC endpoint.
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: Url,

    /// Expected chain ID. The run is refused if the endpoint reports another one.
    #[clap(long, env = "CHAIN_ID")]
    pub chain_id: Option<u64>,
}

impl EndpointConfig {
    /// A read-only connection to the endpoint.
    pub async fn connect_reader(
        &self,
    ) -> Result<(Endpoint, RpcChainReader<DynProvider>), PuzzleError> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone()).erased();
        let endpoint = self.check_chain_id(&provider).await?;
        Ok((endpoint, RpcChainReader::new(provider)))
    }

    async fn check_chain_id(&self, provider: &DynProvider) -> Result<Endpoint, PuzzleError> {
        let chain_id = provider.get_chain_id().await.map_err(ReadError::Connectivity)?;
        if let Some(expected) = self.chain_id {
            if expected != chain_id {
                return Err(PuzzleError::Config(format!(
                    "endpoint {} is on chain {chain_id}, expected chain {expected}",
                    self.rpc_url
                )));
            }
        }
        tracing::debug!("Connected to {} on chain {chain_id}", self.rpc_url);
        Ok(Endpoint { rpc_url: self.rpc_url.clone(), chain_id })
    }
}

/// The signing identity.
#[derive(Args, Debug, Clone)]
pub struct SignerConfig {
    /// Private key used to sign transactions.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: PrivateKeySigner,
}

/// How transactions are confirmed.
#[derive(Args, Debug, Clone)]
pub struct TxConfig {
    /// Seconds to wait for a transaction to be included.
    #[clap(long, env = "TX_TIMEOUT", value_parser = parse_seconds, default_value = "120")]
    pub tx_timeout: Duration,

    /// Number of confirmations to wait for.
    #[clap(long, env = "CONFIRMATIONS", default_value_t = 1)]
    pub confirmations: u64,
}

/// Bounds of predicate scans.
#[derive(Args, Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of reads a single scan may issue before giving up.
    #[clap(
        long,
        env = "MAX_SCAN_ATTEMPTS",
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_scan_attempts: u64,
}

/// Everything needed to connect a puzzle run.
#[derive(Args, Debug, Clone)]
pub struct ChainConfig {
    #[clap(flatten)]
    pub endpoint: EndpointConfig,

    #[clap(flatten)]
    pub signer: SignerConfig,

    #[clap(flatten)]
    pub tx: TxConfig,

    #[clap(flatten)]
    pub scan: ScanConfig,
}

impl ChainConfig {
    /// Connects to the endpoint with a wallet holding the configured key.
    pub async fn connect(&self) -> Result<RpcContext, PuzzleError> {
        let signer = self.signer.private_key.clone();
        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(signer)
            .connect_http(self.endpoint.rpc_url.clone())
            .erased();
        let endpoint = self.endpoint.check_chain_id(&provider).await?;
        tracing::info!("Signing as {sender}");

        let submitter = RpcTxSubmitter::new(provider.clone(), sender)
            .with_confirmations(self.tx.confirmations)
            .with_timeout(self.tx.tx_timeout);

        Ok(ChainContext {
            endpoint,
            reader: RpcChainReader::new(provider),
            submitter,
            max_scan_attempts: self.scan.max_scan_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::submitter::DEFAULT_TX_TIMEOUT;

    #[derive(Parser)]
    struct Cli {
        #[clap(flatten)]
        chain: ChainConfig,
    }

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn defaults() {
        let cli =
            Cli::try_parse_from(["test", "--rpc-url", "http://localhost:8545", "--private-key", KEY])
                .unwrap();

        assert_eq!(cli.chain.tx.tx_timeout, DEFAULT_TX_TIMEOUT);
        assert_eq!(cli.chain.tx.confirmations, 1);
        assert_eq!(cli.chain.scan.max_scan_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(cli.chain.endpoint.chain_id, None);
        assert_eq!(
            cli.chain.signer.private_key.address(),
            alloy::primitives::address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "test",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            KEY,
            "--tx-timeout",
            "30",
            "--confirmations",
            "3",
            "--max-scan-attempts",
            "50",
            "--chain-id",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.chain.tx.tx_timeout, Duration::from_secs(30));
        assert_eq!(cli.chain.tx.confirmations, 3);
        assert_eq!(cli.chain.scan.max_scan_attempts, 50);
        assert_eq!(cli.chain.endpoint.chain_id, Some(5));
    }

    #[test]
    fn rejects_a_zero_scan_bound() {
        assert!(Cli::try_parse_from([
            "test",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            KEY,
            "--max-scan-attempts",
            "0"
        ])
        .is_err());
    }

    #[test]
    fn rejects_a_malformed_key() {
        assert!(Cli::try_parse_from([
            "test",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            "not-a-key"
        ])
        .is_err());
    }
}
