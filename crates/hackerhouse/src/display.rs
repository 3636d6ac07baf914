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

//! Console output of the CLI.

use std::fmt::Display;

use alloy::primitives::{Address, B256};
use colored::Colorize;

use crate::{
    runner::{PuzzleFailure, RunReport},
    submitter::TxRecord,
};

/// Standard display formatter for CLI output
pub struct DisplayManager {
    /// Optional network badge shown in headers
    network: Option<String>,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self { network: None }
    }

    pub fn with_network(network: impl Into<String>) -> Self {
        Self { network: Some(network.into()) }
    }

    /// Print a section header with optional network badge
    pub fn header(&self, title: &str) {
        match &self.network {
            Some(network) => println!("\n{} [{}]", title.bold(), network.blue().bold()),
            None => println!("\n{}", title.bold()),
        }
    }

    /// Print a labeled value with standard indentation
    pub fn item(&self, label: &str, value: impl Display) {
        println!("  {:<24} {}", format!("{label}:"), value);
    }

    pub fn address(&self, label: &str, address: Address) {
        self.item(label, format!("{address:#x}").dimmed());
    }

    pub fn tx_hash(&self, hash: B256) {
        self.item("Transaction", format!("{hash:#x}").cyan());
    }

    pub fn success(&self, message: &str) {
        println!("\n{} {}", "✓".green().bold(), message.green().bold());
    }

    pub fn warning(&self, message: &str) {
        println!("\n{} {}", "⚠".yellow(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("\n{} {}", "✗".red().bold(), message.red());
    }

    /// Print a note or additional info
    pub fn note(&self, message: &str) {
        println!("  {}", message.dimmed());
    }

    /// Print the inclusion details of a confirmed transaction.
    pub fn record(&self, record: &TxRecord) {
        self.tx_hash(record.tx_hash);
        let confirmation = &record.confirmation;
        match confirmation.block_number {
            Some(block) => self.item("Block", block),
            None => self.item("Block", "pending".yellow()),
        }
        if let Some(block_hash) = confirmation.block_hash {
            self.item("Block hash", format!("{block_hash:#x}").dimmed());
        }
        self.item("Gas used", confirmation.gas_used);
    }

    /// Print the values discovered by a run, its transactions and a completion line.
    pub fn report(&self, report: &RunReport) {
        self.header(&format!("Puzzle {}", report.puzzle));
        for (label, value) in &report.observations {
            self.item(label, value);
        }

        let Some((last, prerequisites)) = report.records.split_last() else {
            self.warning("No transaction was submitted");
            return;
        };
        for record in prerequisites {
            self.note("Prerequisite transaction");
            self.record(record);
        }
        self.record(last);
        self.success(&format!(
            "{} completed in transaction {:#x}",
            report.puzzle.to_string().to_uppercase(),
            last.tx_hash
        ));
    }

    /// Print a failed run and the transactions it confirmed before failing.
    pub fn failure(&self, failure: &PuzzleFailure) {
        for record in &failure.records {
            self.note("Confirmed before the failure");
            self.record(record);
        }
        self.error(&failure.to_string());
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable network name of a chain ID.
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "Ethereum Mainnet".to_string(),
        5 => "Goerli".to_string(),
        11155111 => "Ethereum Sepolia".to_string(),
        31337 => "Anvil".to_string(),
        other => format!("chain {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_networks() {
        assert_eq!(network_name(5), "Goerli");
        assert_eq!(network_name(42), "chain 42");
    }
}
