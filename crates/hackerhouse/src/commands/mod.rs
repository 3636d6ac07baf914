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

//! Commands of the hackerhouse CLI.

mod list;
mod run;
mod selector;
mod storage;

pub use list::ListPuzzles;
pub use run::RunPuzzle;
pub use selector::ComputeSelector;
pub use storage::DumpStorage;

use clap::Subcommand;

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Solve a puzzle and claim its NFT.
    Run(Box<RunPuzzle>),
    /// List the puzzles with their tier and known deployment.
    List(ListPuzzles),
    /// Print the canonical signature and selector of a function.
    Selector(ComputeSelector),
    /// Dump raw storage slots of a contract.
    Storage(DumpStorage),
}

impl Command {
    /// Run the command.
    pub async fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Run(cmd) => cmd.run().await,
            Self::List(cmd) => cmd.run(),
            Self::Selector(cmd) => cmd.run(),
            Self::Storage(cmd) => cmd.run().await,
        }
    }
}
