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

use alloy::{
    primitives::{Address, U256},
    sol,
};

use super::PuzzleParams;
use crate::{
    errors::PuzzleError,
    reader::{word_to_u256, ChainReader},
    runner::{InterfaceSource, Runner},
    submitter::{TxRequest, TxSubmitter},
};

/// Slot holding the secret of m3.
pub const SECRET_SLOT: u64 = 777;

sol! {
    interface IMediumOne {
        function mintNft(uint256 oldKey, uint256 newKey) external;
        function getValue(uint256 key) external view returns (bool);
    }

    interface IMediumTwo {
        function mintNft(uint256 amountToAdd, uint256 newStartingValue) external;
        function getCounter() external view returns (uint8);
    }

    interface IMediumThree {
        function mintNft(uint256 secret) external;
    }

    interface IMediumFour {
        function mintNft() external;
        function paymentToken() external view returns (address);
        function fee() external view returns (uint256);
    }

    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Amount that, added to the 8-bit counter `current`, wraps it around to zero.
pub fn amount_to_wrap(current: u8) -> U256 {
    U256::from(u16::from(u8::MAX) + 1 - u16::from(current))
}

pub(super) async fn m1<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let hit = runner
        .scan_view(
            target,
            0u64..,
            |key| IMediumOne::getValueCall { key: U256::from(*key) },
            |_, is_right_key| *is_right_key,
        )
        .await?;
    runner.observe("Key found", hit.candidate);

    let new_key = params.new_value_below(100);
    runner.observe("New key", new_key);

    let call = IMediumOne::mintNftCall { oldKey: U256::from(hit.candidate), newKey: new_key };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn m2<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let counter = runner.read(target, IMediumTwo::getCounterCall {}).await?;
    runner.observe("Current counter", counter);

    let amount = amount_to_wrap(counter);
    runner.observe("Amount to add", amount);

    let new_starting_value = params.new_value_below(u64::from(u8::MAX) + 1);
    runner.observe("New starting value", new_starting_value);

    let call = IMediumTwo::mintNftCall { amountToAdd: amount, newStartingValue: new_starting_value };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn m3<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let word = runner.read_slot(target, U256::from(SECRET_SLOT)).await?;
    runner.observe(format!("Data at slot {SECRET_SLOT}"), word);

    let call = IMediumThree::mintNftCall { secret: word_to_u256(word) };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn m4<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let token = runner.read(target, IMediumFour::paymentTokenCall {}).await?;
    runner.observe("Payment token", token);
    runner.uses_interface("IERC20", token, InterfaceSource::Verified);

    let fee = runner.read(target, IMediumFour::feeCall {}).await?;
    runner.observe("Fee", fee);

    let owner = runner.context().signer_address();
    let allowance = runner.read(token, IERC20::allowanceCall { owner, spender: target }).await?;
    runner.observe("Current allowance", allowance);

    if allowance < fee {
        tracing::info!("Allowance below the fee, approving {fee} for {target}");
        let approve = IERC20::approveCall { spender: target, amount: fee };
        runner.submit(TxRequest::call(token, &approve)).await?;
    }

    runner.submit(TxRequest::call(target, &IMediumFour::mintNftCall {})).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_the_counter_to_zero() {
        assert_eq!(amount_to_wrap(200), U256::from(56));
        assert_eq!(amount_to_wrap(255), U256::from(1));
        assert_eq!(amount_to_wrap(0), U256::from(256));

        for current in [1u8, 17, 128, 254] {
            let sum = U256::from(current) + amount_to_wrap(current);
            assert_eq!(sum % U256::from(256), U256::ZERO);
        }
    }
}
