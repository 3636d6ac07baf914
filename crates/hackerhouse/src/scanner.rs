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

//! Linear predicate search over on-chain state.
//!
//! Some contracts only reveal the right key by enumeration: a getter is called for keys
//! `0, 1, 2, ...` until it returns the wanted value. [predicate_scan] runs that loop with an
//! explicit attempt bound so that a predicate that never holds ends in
//! [ScanError::Exhausted] instead of spinning forever.

use std::{fmt::Debug, future::Future};

use thiserror::Error;

use crate::{errors::CodedError, impl_coded_debug, reader::ReadError};

/// Default bound on the number of reads a scan may issue.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 10_000;

#[derive(Error)]
pub enum ScanError {
    #[error("{code} No candidate satisfied the predicate after {attempts} attempts", code = self.code())]
    Exhausted { attempts: u64 },

    #[error("{code} Candidate read failed: {0}", code = self.code())]
    Read(#[from] ReadError),
}

impl_coded_debug!(ScanError);

impl CodedError for ScanError {
    fn code(&self) -> &str {
        match self {
            ScanError::Exhausted { .. } => "[HH-SC-001]",
            ScanError::Read(err) => err.code(),
        }
    }
}

/// First candidate that satisfied the predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit<C, T> {
    pub candidate: C,
    /// Value read for `candidate`.
    pub value: T,
    /// Number of reads issued, including the one for `candidate`.
    pub attempts: u64,
}

/// Returns the first candidate, in generation order, whose value satisfies `predicate`.
///
/// Reads are issued one at a time. The scan stops with [ScanError::Exhausted] once
/// `max_attempts` reads were made, or earlier if `candidates` runs out. A failed read aborts the
/// scan right away.
pub async fn predicate_scan<I, T, F, Fut, P>(
    candidates: I,
    max_attempts: u64,
    mut read: F,
    predicate: P,
) -> Result<Hit<I::Item, T>, ScanError>
where
    I: IntoIterator,
    I::Item: Clone + Debug,
    T: Debug,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, ReadError>>,
    P: Fn(&I::Item, &T) -> bool,
{
    let bound = usize::try_from(max_attempts).unwrap_or(usize::MAX);
    let mut attempts = 0;
    for candidate in candidates.into_iter().take(bound) {
        attempts += 1;

        let value = read(candidate.clone()).await?;
        tracing::trace!("Scan attempt {attempts}: {candidate:?} -> {value:?}");

        if predicate(&candidate, &value) {
            tracing::info!("Candidate {candidate:?} satisfied the predicate after {attempts} attempts");
            return Ok(Hit { candidate, value, attempts });
        }
    }

    tracing::warn!("Scan exhausted after {attempts} attempts");
    Err(ScanError::Exhausted { attempts })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[tokio::test]
    async fn returns_first_hit_after_k_plus_one_reads() {
        for k in [0u64, 1, 5, 42] {
            let seen = Mutex::new(Vec::new());
            let hit = predicate_scan(
                0u64..,
                100,
                |candidate| {
                    seen.lock().unwrap().push(candidate);
                    async move { Ok::<_, ReadError>(candidate == k) }
                },
                |_, found| *found,
            )
            .await
            .unwrap();

            assert_eq!(hit.candidate, k);
            assert_eq!(hit.attempts, k + 1);
            assert_eq!(*seen.lock().unwrap(), (0..=k).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn stops_at_the_bound() {
        let reads = Mutex::new(0u64);
        let err = predicate_scan(
            0u64..,
            25,
            |_| {
                *reads.lock().unwrap() += 1;
                async { Ok::<_, ReadError>(false) }
            },
            |_, found| *found,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ScanError::Exhausted { attempts: 25 }));
        assert_eq!(*reads.lock().unwrap(), 25);
    }

    #[tokio::test]
    async fn generates_no_candidate_past_the_bound() {
        let generated = Mutex::new(0u64);
        let candidates = std::iter::from_fn(|| {
            let mut generated = generated.lock().unwrap();
            *generated += 1;
            Some(*generated)
        });

        let err = predicate_scan(
            candidates,
            4,
            |candidate| async move { Ok::<_, ReadError>(candidate) },
            |_, _| false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ScanError::Exhausted { attempts: 4 }));
        assert_eq!(*generated.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn finite_candidate_set_exhausts_early() {
        let err = predicate_scan(
            [1u8, 2, 3],
            100,
            |candidate| async move { Ok::<_, ReadError>(candidate) },
            |_, value| *value == 9,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ScanError::Exhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn zero_bound_issues_no_reads() {
        let reads = Mutex::new(0u64);
        let err = predicate_scan(
            0u64..,
            0,
            |_| {
                *reads.lock().unwrap() += 1;
                async { Ok::<_, ReadError>(true) }
            },
            |_, found| *found,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ScanError::Exhausted { attempts: 0 }));
        assert_eq!(*reads.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn restarts_from_the_beginning() {
        for _ in 0..2 {
            let hit = predicate_scan(
                0u64..5,
                10,
                |candidate| async move { Ok::<_, ReadError>(candidate >= 2) },
                |_, found| *found,
            )
            .await
            .unwrap();
            assert_eq!(hit.candidate, 2);
            assert_eq!(hit.attempts, 3);
        }
    }
}
