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

use clap::Args;
use colored::Colorize;

use crate::{display::DisplayManager, errors::PuzzleError, selector};

/// Command to derive a function selector. Works offline.
#[derive(Args, Clone, Debug)]
pub struct ComputeSelector {
    /// Function signature, e.g. `callMeZero(uint256,address)`.
    pub signature: String,
}

impl ComputeSelector {
    /// Run the [ComputeSelector] command.
    pub fn run(&self) -> anyhow::Result<()> {
        let function = selector::parse_signature(&self.signature).map_err(PuzzleError::from)?;

        let display = DisplayManager::new();
        display.header("Selector");
        display.item("Signature", function.signature());
        display.item("Selector", format!("0x{}", hex::encode(function.selector())).cyan());
        Ok(())
    }
}
