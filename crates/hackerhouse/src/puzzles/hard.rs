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

//! Puzzles that go through a helper contract whose address is kept in slot 8 of the puzzle.

use std::fmt::{self, Display};

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::PuzzleParams;
use crate::{
    errors::PuzzleError,
    reader::{word_to_address, word_to_u256, ChainReader},
    runner::{InterfaceSource, Runner},
    scanner::{predicate_scan, ScanError},
    selector::selector,
    submitter::{TxRequest, TxSubmitter},
};

/// Slot of the puzzle contracts holding the helper address.
pub const HELPER_SLOT: u64 = 8;

/// Slot of the h3 helper holding its counter.
pub const COUNTER_SLOT: u64 = 0;

/// `someNumber + 7 == 77` is checked by the h1 helper.
const H1_NUMBER: u64 = 70;

const CALL_ME_ZERO: &str = "callMeZero(uint256,address)";
const DO_SOMETHING_ELSE: &str = "doSomethingElse()";

sol! {
    interface IHardOne {
        function mintNft(bytes4 selector, address myAddress, uint256 myNumber) external;
    }

    interface IHardTwo {
        function mintNft(address yourAddress, bytes4 selector) external;
    }

    interface IHardThree {
        function mintNft(bytes4 selector) external;
    }
}

/// Entry points of the h3 helper, keyed by the counter value each one requires.
///
/// The helper has no verified source. Each `getNumber*` requires its counter value and advances
/// it; the fallback moves the counter from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelperStep {
    One,
    Two,
    Three,
}

impl HelperStep {
    pub const ALL: [HelperStep; 3] = [HelperStep::One, HelperStep::Two, HelperStep::Three];

    /// Counter value the step requires.
    pub fn counter(self) -> U256 {
        match self {
            HelperStep::One => U256::from(1),
            HelperStep::Two => U256::from(2),
            HelperStep::Three => U256::from(3),
        }
    }

    pub fn signature(self) -> &'static str {
        match self {
            HelperStep::One => "getNumberOne()",
            HelperStep::Two => "getNumberTwo()",
            HelperStep::Three => "getNumberThree()",
        }
    }

    /// Scans the steps in order for the one callable with the counter at `value`.
    pub async fn for_counter(value: U256) -> Result<Self, ScanError> {
        let hit = predicate_scan(
            Self::ALL,
            Self::ALL.len() as u64,
            |step| async move { Ok(step.counter()) },
            |_, required| *required == value,
        )
        .await?;
        Ok(hit.candidate)
    }
}

impl Display for HelperStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature())
    }
}

async fn helper_address<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<Address, PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let word = runner.read_slot(target, U256::from(HELPER_SLOT)).await?;
    runner.observe(format!("Data at slot {HELPER_SLOT}"), word);

    let helper = word_to_address(word);
    runner.observe("Helper address", helper);
    Ok(helper)
}

pub(super) async fn h1<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    helper_address(runner, target).await?;

    let call_me_zero = selector(CALL_ME_ZERO)?;
    runner.observe(format!("Selector of {CALL_ME_ZERO}"), call_me_zero);

    let call = IHardOne::mintNftCall {
        selector: call_me_zero,
        myAddress: runner.context().signer_address(),
        myNumber: U256::from(H1_NUMBER),
    };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn h2<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let external = params.external_contract.ok_or_else(|| {
        PuzzleError::Config(
            "h2 needs a contract of your own; set H2_CONTRACT_ADDRESS or --h2-contract-address"
                .to_string(),
        )
    })?;

    helper_address(runner, target).await?;

    let do_something_else = selector(DO_SOMETHING_ELSE)?;
    runner.observe(format!("Selector of {DO_SOMETHING_ELSE}"), do_something_else);

    let call = IHardTwo::mintNftCall { yourAddress: external, selector: do_something_else };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn h3<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let helper = helper_address(runner, target).await?;
    runner.uses_interface("h3 helper", helper, InterfaceSource::Decompiled);

    let mut counter = word_to_u256(runner.read_slot(helper, U256::from(COUNTER_SLOT)).await?);
    runner.observe("Current value", counter);

    if counter.is_zero() {
        tracing::info!("Helper counter is 0, calling its fallback");
        runner.submit(TxRequest::transfer(helper, U256::ZERO)).await?;

        counter = word_to_u256(runner.read_slot(helper, U256::from(COUNTER_SLOT)).await?);
        runner.observe("Value after fallback", counter);
    }

    let step = HelperStep::for_counter(counter).await.map_err(|_| {
        PuzzleError::UnexpectedState(format!(
            "helper counter at {helper} is {counter}, expected one of 1, 2 or 3"
        ))
    })?;
    let step_selector = selector(step.signature())?;
    runner.observe("Calling", step);

    let call = IHardThree::mintNftCall { selector: step_selector };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}
