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

use crate::{display::DisplayManager, Puzzle, Tier};

/// Command to list the puzzles.
#[derive(Args, Clone, Debug)]
pub struct ListPuzzles {
    /// Only list puzzles of this tier.
    #[clap(long, value_parser = parse_tier)]
    pub tier: Option<Tier>,
}

fn parse_tier(arg: &str) -> Result<Tier, String> {
    match arg.to_ascii_lowercase().as_str() {
        "easy" => Ok(Tier::Easy),
        "medium" => Ok(Tier::Medium),
        "hard" => Ok(Tier::Hard),
        other => Err(format!("unknown tier {other:?}, expected easy, medium or hard")),
    }
}

impl ListPuzzles {
    /// Run the [ListPuzzles] command.
    pub fn run(&self) -> anyhow::Result<()> {
        let display = DisplayManager::new();
        display.header("Puzzles");

        let puzzles = Puzzle::ALL.into_iter().filter(|p| self.tier.map_or(true, |t| p.tier() == t));
        for puzzle in puzzles {
            let address = match puzzle.default_address() {
                Some(address) => format!("{:<44}", format!("{address:#x}")).dimmed(),
                None => format!("{:<44}", "--target required").yellow(),
            };
            println!(
                "  {} {:<7} {} {}",
                format!("{:<4}", puzzle.to_string()).bold(),
                puzzle.tier().to_string(),
                address,
                puzzle.description()
            );
        }
        Ok(())
    }
}
