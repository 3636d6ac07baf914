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
    primitives::{address, Address, U256},
    sol,
};

use super::PuzzleParams;
use crate::{
    errors::PuzzleError,
    reader::ChainReader,
    runner::{InterfaceSource, Runner},
    submitter::{TxRequest, TxSubmitter},
};

/// Chainlink ETH/USD feed on Goerli.
pub const ETH_USD_FEED: Address = address!("0xD4a33860578De61DBAbDc8BFdb98FD742fA7028e");

/// Length of the `bool[5] s_booleanArray` of e4.
const BOOLEAN_ARRAY_LEN: u64 = 5;

/// Message sent to e2 when none is given. The contract accepts any string.
const DEFAULT_MESSAGE: &str = "any string";

sol! {
    interface IEasyOne {
        function mintNft() external;
    }

    interface IEasyTwo {
        function mintNft(string memory message) external;
    }

    interface IEasyThree {
        function mintNft(uint256 value) external;
    }

    interface IEasyFour {
        function mintNft(uint256 location, uint256 newLocation) external;
        function getBooleanArray(uint256 index) external view returns (bool);
    }

    interface IEasyFive {
        struct MyStruct {
            uint256 a;
            uint256 b;
            uint256 c;
        }

        function mintNft(uint256 valueAtA, uint256 newValueAtA) external;
        function getStruct() external view returns (MyStruct memory myStruct);
    }

    interface AggregatorV3Interface {
        function latestRoundData() external view returns (
            uint80 roundId,
            int256 answer,
            uint256 startedAt,
            uint256 updatedAt,
            uint80 answeredInRound
        );
    }

    interface IEasySix {
        function mintNft(int256 priceOfEth) external;
    }

    interface IEasySeven {
        function mintNft(uint256 key) external;
        function getMappingValue(uint256 key) external view returns (bool);
    }
}

pub(super) async fn e1<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    runner.submit(TxRequest::call(target, &IEasyOne::mintNftCall {})).await?;
    Ok(())
}

pub(super) async fn e2<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let message = params.message.clone().unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    runner.observe("Message", &message);

    runner.submit(TxRequest::call(target, &IEasyTwo::mintNftCall { message })).await?;
    Ok(())
}

pub(super) async fn e3<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let call = IEasyThree::mintNftCall { value: U256::from(2) };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn e4<R, S>(
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
            0..BOOLEAN_ARRAY_LEN,
            |index| IEasyFour::getBooleanArrayCall { index: U256::from(*index) },
            |_, available| *available,
        )
        .await?;
    runner.observe("Current location", hit.candidate);

    let new_location = params.new_value_below(BOOLEAN_ARRAY_LEN + 1);
    runner.observe("New location", new_location);

    let call =
        IEasyFour::mintNftCall { location: U256::from(hit.candidate), newLocation: new_location };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn e5<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let current = runner.read(target, IEasyFive::getStructCall {}).await?;
    runner.observe("Current value at A", current.a);

    let new_value = params.new_value_below(600);
    runner.observe("New value at A", new_value);

    let call = IEasyFive::mintNftCall { valueAtA: current.a, newValueAtA: new_value };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn e6<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
    params: &PuzzleParams,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let feed = params.price_feed.unwrap_or(ETH_USD_FEED);
    runner.uses_interface("AggregatorV3Interface", feed, InterfaceSource::Verified);

    let round = runner.read(feed, AggregatorV3Interface::latestRoundDataCall {}).await?;
    runner.observe("Current ETH price in USD", round.answer);

    let call = IEasySix::mintNftCall { priceOfEth: round.answer };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

pub(super) async fn e7<R, S>(
    runner: &mut Runner<'_, R, S>,
    target: Address,
) -> Result<(), PuzzleError>
where
    R: ChainReader,
    S: TxSubmitter,
{
    let hit = runner
        .scan_view(
            target,
            0u64..,
            |key| IEasySeven::getMappingValueCall { key: U256::from(*key) },
            |_, taken| !*taken,
        )
        .await?;
    runner.observe("Key", hit.candidate);

    let call = IEasySeven::mintNftCall { key: U256::from(hit.candidate) };
    runner.submit(TxRequest::call(target, &call)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{aliases::U80, I256},
        sol_types::SolCall,
    };

    use super::*;
    use crate::{
        runner::{execute, ChainContext, Endpoint},
        test_utils::MockChain,
        Puzzle,
    };

    fn ctx(chain: &MockChain) -> ChainContext<MockChain, MockChain> {
        ChainContext {
            endpoint: Endpoint { rpc_url: "http://localhost:8545".parse().unwrap(), chain_id: 5 },
            reader: chain.clone(),
            submitter: chain.clone(),
            max_scan_attempts: 100,
        }
    }

    #[tokio::test]
    async fn e4_moves_the_first_available_location() {
        let target = Puzzle::E4.default_address().unwrap();
        let chain = MockChain::new().with_view(target, |input| {
            let call = IEasyFour::getBooleanArrayCall::abi_decode(input).ok()?;
            let available = call.index == U256::from(3);
            Some(IEasyFour::getBooleanArrayCall::abi_encode_returns(&available).into())
        });
        let params = PuzzleParams { new_value: Some(U256::from(1)), ..Default::default() };

        let report = execute(&ctx(&chain), Puzzle::E4, &params).await.unwrap();

        assert_eq!(report.observation("Current location"), Some("3"));
        assert_eq!(chain.view_calls().len(), 4);
        let input = chain.sent()[0].input.clone().unwrap();
        let sent = IEasyFour::mintNftCall::abi_decode(&input).unwrap();
        assert_eq!(sent.location, U256::from(3));
        assert_eq!(sent.newLocation, U256::from(1));
    }

    #[tokio::test]
    async fn e4_with_no_available_location_is_exhausted() {
        let target = Puzzle::E4.default_address().unwrap();
        let chain = MockChain::new().with_view(target, |_| {
            Some(IEasyFour::getBooleanArrayCall::abi_encode_returns(&false).into())
        });

        let failure = execute(&ctx(&chain), Puzzle::E4, &Default::default()).await.unwrap_err();

        assert!(matches!(failure.error, PuzzleError::Exhausted { attempts: 5 }));
        assert!(chain.sent().is_empty());
    }

    #[tokio::test]
    async fn e5_passes_the_current_struct_value() {
        let target = Puzzle::E5.default_address().unwrap();
        let chain = MockChain::new().with_view(target, |_| {
            let current =
                IEasyFive::MyStruct { a: U256::from(417), b: U256::from(1), c: U256::from(2) };
            Some(IEasyFive::getStructCall::abi_encode_returns(&current).into())
        });
        let params = PuzzleParams { new_value: Some(U256::from(12)), ..Default::default() };

        execute(&ctx(&chain), Puzzle::E5, &params).await.unwrap();

        let input = chain.sent()[0].input.clone().unwrap();
        let sent = IEasyFive::mintNftCall::abi_decode(&input).unwrap();
        assert_eq!(sent.valueAtA, U256::from(417));
        assert_eq!(sent.newValueAtA, U256::from(12));
    }

    #[tokio::test]
    async fn e6_passes_the_feed_answer() {
        let target = Puzzle::E6.default_address().unwrap();
        let answer = I256::try_from(132_512_000_000i64).unwrap();
        let chain = MockChain::new().with_view(ETH_USD_FEED, move |_| {
            let round = AggregatorV3Interface::latestRoundDataReturn {
                roundId: U80::from(7),
                answer,
                startedAt: U256::from(1),
                updatedAt: U256::from(2),
                answeredInRound: U80::from(7),
            };
            Some(AggregatorV3Interface::latestRoundDataCall::abi_encode_returns(&round).into())
        });

        let report = execute(&ctx(&chain), Puzzle::E6, &Default::default()).await.unwrap();

        let sent = chain.sent();
        assert_eq!(sent[0].to, target);
        let call = IEasySix::mintNftCall::abi_decode(sent[0].input.as_ref().unwrap()).unwrap();
        assert_eq!(call.priceOfEth, answer);
        assert_eq!(report.observation("Current ETH price in USD"), Some("132512000000"));
    }

    #[tokio::test]
    async fn e7_takes_the_first_free_key() {
        let target = Puzzle::E7.default_address().unwrap();
        let chain = MockChain::new().with_view(target, |input| {
            let call = IEasySeven::getMappingValueCall::abi_decode(input).ok()?;
            let taken = call.key < U256::from(12);
            Some(IEasySeven::getMappingValueCall::abi_encode_returns(&taken).into())
        });

        let report = execute(&ctx(&chain), Puzzle::E7, &Default::default()).await.unwrap();

        assert_eq!(report.observation("Key"), Some("12"));
        assert_eq!(chain.view_calls().len(), 13);
        let input = chain.sent()[0].input.clone().unwrap();
        let call = IEasySeven::mintNftCall::abi_decode(&input).unwrap();
        assert_eq!(call.key, U256::from(12));
    }

    #[tokio::test]
    async fn e2_defaults_to_any_string() {
        let chain = MockChain::new();

        execute(&ctx(&chain), Puzzle::E2, &Default::default()).await.unwrap();

        let input = chain.sent()[0].input.clone().unwrap();
        let call = IEasyTwo::mintNftCall::abi_decode(&input).unwrap();
        assert_eq!(call.message, DEFAULT_MESSAGE);
    }
}
