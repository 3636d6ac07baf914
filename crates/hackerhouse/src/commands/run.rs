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

use alloy::primitives::{Address, U256};
use clap::Args;

use crate::{
    config::ChainConfig,
    display::{network_name, DisplayManager},
    runner::execute,
    Puzzle, PuzzleParams,
};

/// Command to solve one puzzle.
#[derive(Args, Clone, Debug)]
pub struct RunPuzzle {
    /// Puzzle to solve.
    #[clap(value_enum)]
    pub puzzle: Puzzle,

    /// Address of the puzzle contract. Required for puzzles without a known deployment.
    #[clap(long)]
    pub target: Option<Address>,

    /// New value written by the puzzle (location, key or starting value). Random if unset.
    #[clap(long)]
    pub new_value: Option<U256>,

    /// String passed to e2.
    #[clap(long)]
    pub message: Option<String>,

    /// Contract of your own that the h2 helper calls back.
    #[clap(long, env = "H2_CONTRACT_ADDRESS")]
    pub h2_contract_address: Option<Address>,

    /// Chainlink ETH/USD aggregator read by e6.
    #[clap(long, env = "PRICE_FEED_ADDRESS")]
    pub price_feed: Option<Address>,

    #[clap(flatten, next_help_heading = "Chain")]
    pub chain: ChainConfig,
}

impl RunPuzzle {
    pub fn params(&self) -> PuzzleParams {
        PuzzleParams {
            target: self.target,
            new_value: self.new_value,
            message: self.message.clone(),
            external_contract: self.h2_contract_address,
            price_feed: self.price_feed,
        }
    }

    /// Run the [RunPuzzle] command.
    pub async fn run(&self) -> anyhow::Result<()> {
        let params = self.params();
        // Fail before connecting when the contract is unknown.
        params.target_for(self.puzzle)?;

        let ctx = self.chain.connect().await?;
        let display = DisplayManager::with_network(network_name(ctx.endpoint.chain_id));
        display.header("Signer");
        display.address("Address", ctx.signer_address());

        match execute(&ctx, self.puzzle, &params).await {
            Ok(report) => {
                display.report(&report);
                Ok(())
            }
            Err(failure) => {
                display.failure(&failure);
                Err(failure.into())
            }
        }
    }
}
