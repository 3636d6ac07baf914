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

//! The SmartCon 2022 Hacker House puzzles.
//!
//! Every puzzle reads a little state, derives the input the contract expects and claims its NFT
//! with a `mintNft` call. Default addresses are the Goerli deployments.

mod easy;
mod hard;
mod medium;

pub use hard::HelperStep;
pub use medium::amount_to_wrap;

use std::fmt::{self, Display};

use alloy::primitives::{address, Address, U256};
use clap::ValueEnum;
use rand::Rng;

use crate::{
    errors::PuzzleError,
    reader::ChainReader,
    runner::{InterfaceSource, Runner},
    submitter::TxSubmitter,
};

/// Difficulty tier of a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Easy => write!(f, "easy"),
            Tier::Medium => write!(f, "medium"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

/// Selects the puzzle to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Puzzle {
    E1,
    E2,
    E3,
    E4,
    E5,
    E6,
    E7,
    M1,
    M2,
    M3,
    M4,
    H1,
    H2,
    H3,
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{self:?}");
        f.write_str(&name.to_lowercase())
    }
}

impl Puzzle {
    pub const ALL: [Puzzle; 14] = [
        Puzzle::E1,
        Puzzle::E2,
        Puzzle::E3,
        Puzzle::E4,
        Puzzle::E5,
        Puzzle::E6,
        Puzzle::E7,
        Puzzle::M1,
        Puzzle::M2,
        Puzzle::M3,
        Puzzle::M4,
        Puzzle::H1,
        Puzzle::H2,
        Puzzle::H3,
    ];

    pub fn tier(self) -> Tier {
        match self {
            Puzzle::E1 | Puzzle::E2 | Puzzle::E3 | Puzzle::E4 | Puzzle::E5 | Puzzle::E6 | Puzzle::E7 => {
                Tier::Easy
            }
            Puzzle::M1 | Puzzle::M2 | Puzzle::M3 | Puzzle::M4 => Tier::Medium,
            Puzzle::H1 | Puzzle::H2 | Puzzle::H3 => Tier::Hard,
        }
    }

    /// Address of the known deployment, if any.
    pub fn default_address(self) -> Option<Address> {
        match self {
            Puzzle::E1 => Some(address!("0xeD44562aD64731E4c407a34f7C181eF962dA8e89")),
            Puzzle::E2 => Some(address!("0x79526378aF06BbD1B6Af8628D58E5f4456565BF3")),
            Puzzle::E3 => Some(address!("0x7c32eb9cc143d8cef208824e048e762e3caf4919")),
            Puzzle::E4 => Some(address!("0x46B6c3446dc78517E61e59Ac76AB605dCCb1Dd7e")),
            Puzzle::E5 => Some(address!("0x59a9E94f3F9b874e1bB7319973AB6063E9b95380")),
            Puzzle::E6 => Some(address!("0xD547C52FDE4E1e2C17E5d3E3a6DA87990e922711")),
            Puzzle::E7 => Some(address!("0xf9Fce2937a71E83EBe43dfbc726B6212c9EB6106")),
            Puzzle::M1 => Some(address!("0x8407C7686eA96760263ED11eC7EF059361e8CD27")),
            Puzzle::M2 | Puzzle::M3 | Puzzle::M4 => None,
            Puzzle::H1 => Some(address!("0xeb2bC2378A86Ee12e855f91fbD46f73CC2Ed664e")),
            Puzzle::H2 => Some(address!("0x35182E3182B08fe968B2619f6eE161Cd5f5CeFb1")),
            Puzzle::H3 => Some(address!("0xDA47cAdADC4B7ab574085D83cE1Ed9a375DdB743")),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Puzzle::E1 => "call mintNft()",
            Puzzle::E2 => "call mintNft(string) with any string",
            Puzzle::E3 => "call mintNft(uint256) with the value 2",
            Puzzle::E4 => "find an available slot of the boolean array and move it",
            Puzzle::E5 => "pass the current value of the struct field a",
            Puzzle::E6 => "pass the current ETH/USD price of the Chainlink feed",
            Puzzle::E7 => "find a mapping key that is not taken yet",
            Puzzle::M1 => "find the key whose mapping value is true",
            Puzzle::M2 => "overflow the 8-bit counter back to zero",
            Puzzle::M3 => "pass the secret stored in slot 777",
            Puzzle::M4 => "approve the payment token, then mint",
            Puzzle::H1 => "pass the selector of callMeZero(uint256,address) to the helper",
            Puzzle::H2 => "make the helper call back into your own contract",
            Puzzle::H3 => "advance the decompiled helper's counter by selector",
        }
    }
}

/// Inputs of a run that the caller may choose.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PuzzleParams {
    /// Contract to solve, overriding the known deployment.
    pub target: Option<Address>,
    /// New value written by puzzles that move state (location, key, starting value).
    pub new_value: Option<U256>,
    /// String passed to e2.
    pub message: Option<String>,
    /// Contract of your own that h2 makes the helper call.
    pub external_contract: Option<Address>,
    /// Chainlink ETH/USD feed used by e6.
    pub price_feed: Option<Address>,
}

impl PuzzleParams {
    /// The contract to solve for `puzzle`.
    pub fn target_for(&self, puzzle: Puzzle) -> Result<Address, PuzzleError> {
        self.target.or_else(|| puzzle.default_address()).ok_or_else(|| {
            PuzzleError::Config(format!(
                "puzzle {puzzle} has no known deployment; pass its address with --target"
            ))
        })
    }

    /// The caller-chosen new value, or a random one below `upper`.
    pub fn new_value_below(&self, upper: u64) -> U256 {
        self.new_value.unwrap_or_else(|| U256::from(rand::thread_rng().gen_range(0..upper)))
    }
}

/// Runs the sequence of `runner`'s puzzle.
pub(crate) async fn run<R, S>(
    runner: &mut Runner<'_, R, S>,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let puzzle = runner.puzzle();
    let target = params.target_for(puzzle)?;
    runner.observe("Contract", target);
    runner.uses_interface(&puzzle.to_string(), target, InterfaceSource::Verified);

    match puzzle {
        Puzzle::E1 => easy::e1(runner, target).await,
        Puzzle::E2 => easy::e2(runner, target, params).await,
        Puzzle::E3 => easy::e3(runner, target).await,
        Puzzle::E4 => easy::e4(runner, target, params).await,
        Puzzle::E5 => easy::e5(runner, target, params).await,
        Puzzle::E6 => easy::e6(runner, target, params).await,
        Puzzle::E7 => easy::e7(runner, target).await,
        Puzzle::M1 => medium::m1(runner, target, params).await,
        Puzzle::M2 => medium::m2(runner, target, params).await,
        Puzzle::M3 => medium::m3(runner, target).await,
        Puzzle::M4 => medium::m4(runner, target).await,
        Puzzle::H1 => hard::h1(runner, target).await,
        Puzzle::H2 => hard::h2(runner, target, params).await,
        Puzzle::H3 => hard::h3(runner, target).await,
    }
}
