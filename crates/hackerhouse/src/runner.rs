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

//! Per-puzzle state machine: read, optionally scan, then submit and confirm.

use std::fmt::{self, Debug, Display};

use alloy::{
    primitives::{Address, B256, U256},
    sol_types::SolCall,
};
use thiserror::Error;
use url::Url;

use crate::{
    errors::{CodedError, ErrorKind, PuzzleError},
    reader::{self, ChainReader},
    scanner::{self, Hit},
    submitter::{self, TxRecord, TxRequest, TxSubmitter},
    Puzzle,
};

/// The endpoint the process talks to. Fixed once the process has connected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub rpc_url: Url,
    pub chain_id: u64,
}

/// Everything a puzzle run needs from the outside world.
///
/// Passed explicitly so that tests can swap in an in-memory chain.
pub struct ChainContext<R, S> {
    pub endpoint: Endpoint,
    pub reader: R,
    pub submitter: S,
    /// Upper bound on the reads of a single predicate scan.
    pub max_scan_attempts: u64,
}

impl<R, S> ChainContext<R, S>
where
    S: TxSubmitter,
{
    /// Address of the signing identity.
    pub fn signer_address(&self) -> Address {
        self.submitter.sender()
    }
}

/// Stage of a puzzle run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Reading,
    Scanning,
    Submitting,
    Confirmed,
    Failed,
}

impl Stage {
    /// Whether the runner may move from `self` to `next`.
    ///
    /// `Confirmed` is only terminal once the run is finished: a confirmed prerequisite
    /// transaction may be followed by more reads or the next submission.
    pub fn can_transition_to(self, next: Stage) -> bool {
        use Stage::*;
        match (self, next) {
            (Failed, _) => false,
            (_, Failed) => true,
            (Idle, Reading) => true,
            (Reading, Reading | Scanning | Submitting) => true,
            (Scanning, Reading | Submitting) => true,
            (Submitting, Confirmed) => true,
            (Confirmed, Reading | Submitting) => true,
            _ => false,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Where an interface fragment comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceSource {
    /// Taken from verified source code.
    Verified,
    /// Reconstructed from decompiled bytecode. A hypothesis about the deployed contract.
    Decompiled,
}

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub puzzle: Puzzle,
    /// Intermediate values discovered along the way, in order.
    pub observations: Vec<(String, String)>,
    /// Confirmed transactions, prerequisites first.
    pub records: Vec<TxRecord>,
}

impl RunReport {
    /// The reward-claiming transaction.
    pub fn final_record(&self) -> Option<&TxRecord> {
        self.records.last()
    }

    pub fn observation(&self, label: &str) -> Option<&str> {
        self.observations.iter().find(|(l, _)| l == label).map(|(_, value)| value.as_str())
    }
}

/// A failed run, with the stage it failed in.
#[derive(Error)]
#[error("{code} Puzzle {puzzle} failed while {stage}: {error}", code = self.code())]
pub struct PuzzleFailure {
    pub puzzle: Puzzle,
    pub stage: Stage,
    #[source]
    pub error: PuzzleError,
    /// Transactions confirmed before the failure.
    pub records: Vec<TxRecord>,
}

crate::impl_coded_debug!(PuzzleFailure);

impl CodedError for PuzzleFailure {
    fn code(&self) -> &str {
        self.error.code()
    }
}

impl PuzzleFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Drives a single puzzle through its stages.
pub struct Runner<'a, R, S> {
    ctx: &'a ChainContext<R, S>,
    puzzle: Puzzle,
    stage: Stage,
    observations: Vec<(String, String)>,
    records: Vec<TxRecord>,
}

impl<'a, R, S> Runner<'a, R, S>
where
    R: ChainReader,
    S: TxSubmitter,
{
    pub fn new(ctx: &'a ChainContext<R, S>, puzzle: Puzzle) -> Self {
        Self { ctx, puzzle, stage: Stage::Idle, observations: Vec::new(), records: Vec::new() }
    }

    pub fn context(&self) -> &'a ChainContext<R, S> {
        self.ctx
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn puzzle(&self) -> Puzzle {
        self.puzzle
    }

    fn transition(&mut self, next: Stage) -> Result<(), PuzzleError> {
        if !self.stage.can_transition_to(next) {
            return Err(PuzzleError::InvalidTransition { from: self.stage, to: next });
        }
        tracing::debug!("{}: {} -> {}", self.puzzle, self.stage, next);
        self.stage = next;
        Ok(())
    }

    /// Starts the run: `Idle -> Reading`.
    pub fn begin(&mut self) -> Result<(), PuzzleError> {
        self.transition(Stage::Reading)
    }

    /// Records and logs an intermediate value.
    pub fn observe(&mut self, label: impl Into<String>, value: impl Display) {
        let label = label.into();
        let value = value.to_string();
        tracing::info!("{label}: {value}");
        self.observations.push((label, value));
    }

    /// Logs which interface fragment is used for `address`.
    pub fn uses_interface(&self, name: &str, address: Address, source: InterfaceSource) {
        match source {
            InterfaceSource::Verified => {
                tracing::debug!("Using verified interface {name} at {address}")
            }
            InterfaceSource::Decompiled => tracing::warn!(
                "Using interface {name} at {address} reconstructed from decompiled bytecode; \
                 calls may not match the deployed contract"
            ),
        }
    }

    /// Calls a view function.
    pub async fn read<C: SolCall>(&mut self, to: Address, call: C) -> Result<C::Return, PuzzleError> {
        self.transition(Stage::Reading)?;
        Ok(reader::read_view(&self.ctx.reader, to, &call).await?)
    }

    /// Reads a raw storage slot.
    pub async fn read_slot(&mut self, address: Address, slot: U256) -> Result<B256, PuzzleError> {
        self.transition(Stage::Reading)?;
        Ok(reader::read_slot(&self.ctx.reader, address, slot).await?)
    }

    /// Scans `candidates` with the view call built by `make_call` until `predicate` holds, within
    /// the configured attempt bound.
    pub async fn scan_view<I, C, M, P>(
        &mut self,
        to: Address,
        candidates: I,
        make_call: M,
        predicate: P,
    ) -> Result<Hit<I::Item, C::Return>, PuzzleError>
    where
        I: IntoIterator,
        I::Item: Clone + Debug,
        C: SolCall,
        C::Return: Debug,
        M: Fn(&I::Item) -> C,
        P: Fn(&I::Item, &C::Return) -> bool,
    {
        self.transition(Stage::Scanning)?;
        let reader = &self.ctx.reader;
        let hit = scanner::predicate_scan(
            candidates,
            self.ctx.max_scan_attempts,
            |candidate| {
                let call = make_call(&candidate);
                async move { reader::read_view(reader, to, &call).await }
            },
            predicate,
        )
        .await?;
        Ok(hit)
    }

    /// Submits `request` and waits for its confirmation.
    pub async fn submit(&mut self, request: TxRequest) -> Result<TxRecord, PuzzleError> {
        self.transition(Stage::Submitting)?;
        let record = submitter::submit(&self.ctx.submitter, request).await?;
        self.transition(Stage::Confirmed)?;
        self.records.push(record.clone());
        Ok(record)
    }

    fn into_report(self) -> RunReport {
        RunReport { puzzle: self.puzzle, observations: self.observations, records: self.records }
    }
}

/// Runs `puzzle` to completion against `ctx`.
pub async fn execute<R, S>(
    ctx: &ChainContext<R, S>,
    puzzle: Puzzle,
    params: &crate::PuzzleParams,
) -> Result<RunReport, PuzzleFailure>
where
    R: ChainReader,
    S: TxSubmitter,
{
    tracing::info!("Running puzzle {puzzle} on chain {}", ctx.endpoint.chain_id);
    let mut runner = Runner::new(ctx, puzzle);

    let result = match runner.begin() {
        Ok(()) => crate::puzzles::run(&mut runner, params).await,
        Err(err) => Err(err),
    };
    let outcome = match result {
        Ok(()) if runner.stage() == Stage::Confirmed => Ok(()),
        Ok(()) => Err(PuzzleError::InvalidTransition { from: runner.stage(), to: Stage::Confirmed }),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => Ok(runner.into_report()),
        Err(error) => {
            let stage = runner.stage();
            tracing::error!("Puzzle {puzzle} failed while {stage}: {error}");
            runner.stage = Stage::Failed;
            Err(PuzzleFailure { puzzle, stage, error, records: runner.records })
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::{primitives::U256, sol};

    use super::*;
    use crate::test_utils::MockChain;

    sol! {
        interface IGate {
            function isOpen() external view returns (bool);
            function mintNft() external;
        }
    }

    fn ctx(chain: MockChain) -> ChainContext<MockChain, MockChain> {
        ChainContext {
            endpoint: Endpoint { rpc_url: "http://localhost:8545".parse().unwrap(), chain_id: 5 },
            reader: chain.clone(),
            submitter: chain,
            max_scan_attempts: 10,
        }
    }

    #[test]
    fn transitions() {
        use Stage::*;
        assert!(Idle.can_transition_to(Reading));
        assert!(Reading.can_transition_to(Scanning));
        assert!(Reading.can_transition_to(Submitting));
        assert!(Scanning.can_transition_to(Submitting));
        assert!(Submitting.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Submitting));
        assert!(Scanning.can_transition_to(Failed));

        assert!(!Idle.can_transition_to(Confirmed));
        assert!(!Reading.can_transition_to(Confirmed));
        assert!(!Submitting.can_transition_to(Scanning));
        assert!(!Failed.can_transition_to(Reading));
    }

    #[tokio::test]
    async fn read_then_submit_confirms() {
        let gate = Address::repeat_byte(0x01);
        let chain = MockChain::new()
            .with_view(gate, |_| Some(IGate::isOpenCall::abi_encode_returns(&true).into()));
        let ctx = ctx(chain);
        let mut runner = Runner::new(&ctx, Puzzle::E1);

        assert!(runner.read(gate, IGate::isOpenCall {}).await.unwrap());
        assert_eq!(runner.stage(), Stage::Reading);

        runner.submit(TxRequest::call(gate, &IGate::mintNftCall {})).await.unwrap();
        assert_eq!(runner.stage(), Stage::Confirmed);
        assert_eq!(runner.into_report().records.len(), 1);
    }

    #[tokio::test]
    async fn second_submission_needs_the_first_confirmed() {
        let chain = MockChain::new().reverting();
        let ctx = ctx(chain.clone());
        let mut runner = Runner::new(&ctx, Puzzle::E1);

        runner.begin().unwrap();
        let err = runner.submit(TxRequest::transfer(Address::ZERO, U256::ZERO)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Submission);
        assert_eq!(runner.stage(), Stage::Submitting);

        // Still submitting: the claiming step cannot start from here.
        let err = runner.transition(Stage::Reading).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidTransition { from: Stage::Submitting, .. }));
        assert_eq!(chain.sent().len(), 1);
    }

    #[tokio::test]
    async fn submit_straight_from_idle_is_rejected() {
        let ctx = ctx(MockChain::new());
        let mut runner = Runner::new(&ctx, Puzzle::E1);

        let err = runner.submit(TxRequest::transfer(Address::ZERO, U256::ZERO)).await.unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidTransition { from: Stage::Idle, to: Stage::Submitting }));
    }

    #[tokio::test]
    async fn failure_reports_the_stage() {
        let ctx = ctx(MockChain::new().offline());
        let failure = execute(&ctx, Puzzle::H1, &Default::default()).await.unwrap_err();

        assert_eq!(failure.stage, Stage::Reading);
        assert_eq!(failure.kind(), ErrorKind::Connectivity);
        assert!(failure.records.is_empty());
        assert!(failure.to_string().contains("while Reading"));
    }
}
