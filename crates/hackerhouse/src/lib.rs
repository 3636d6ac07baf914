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

//! Solvers for the SmartCon 2022 Hacker House NFT puzzles.
//!
//! Each puzzle is a deployed contract that mints an NFT once it receives the right input. A run
//! reads on-chain state through a [reader::ChainReader], optionally scans for a key with
//! [scanner::predicate_scan], derives function selectors where needed and submits the claiming
//! transaction through a [submitter::TxSubmitter]. [runner::execute] drives the whole sequence.

pub mod commands;
pub mod config;
pub mod display;
pub mod errors;
pub mod puzzles;
pub mod reader;
pub mod runner;
pub mod scanner;
pub mod selector;
pub mod submitter;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use errors::{CodedError, ErrorKind, PuzzleError};
pub use puzzles::{Puzzle, PuzzleParams, Tier};
pub use runner::{execute, ChainContext, Endpoint, PuzzleFailure, RunReport, Stage};
