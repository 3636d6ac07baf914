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

//! Error codes and the top level error of a puzzle run.

use std::process::ExitCode;

use thiserror::Error;

use crate::{
    reader::ReadError,
    runner::{PuzzleFailure, Stage},
    scanner::ScanError,
    selector::SelectorError,
    submitter::SubmitError,
};

/// An error that carries a stable, greppable code.
pub trait CodedError: std::error::Error {
    /// The code of this error, e.g. `[HH-RD-501]`.
    fn code(&self) -> &str;
}

/// Implements [std::fmt::Debug] by printing the display string followed by the source chain.
///
/// The display string of a [CodedError] already carries its code.
#[macro_export]
macro_rules! impl_coded_debug {
    ($name:ident) => {
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self)?;
                let mut source = std::error::Error::source(self);
                while let Some(err) = source {
                    write!(f, "\n  caused by: {}", err)?;
                    source = err.source();
                }
                Ok(())
            }
        }
    };
}

/// Coarse classification of a failure, used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration.
    Config,
    /// The endpoint is unreachable or answered with a malformed response.
    Connectivity,
    /// Returned data did not match the interface fragment.
    Decode,
    /// A predicate scan ran out of attempts.
    Exhausted,
    /// A transaction was rejected or reverted.
    Submission,
    /// Inclusion was not observed before the deadline.
    ConfirmationTimeout,
    /// On-chain state outside of what the puzzle sequence can handle.
    UnexpectedState,
    /// Anything else, including programming errors.
    Unexpected,
}

impl ErrorKind {
    /// Exit status of the process when a run fails with this kind.
    pub fn exit_status(self) -> u8 {
        match self {
            ErrorKind::Unexpected => 1,
            ErrorKind::Config => 2,
            ErrorKind::Connectivity => 10,
            ErrorKind::Decode => 11,
            ErrorKind::Exhausted => 12,
            ErrorKind::Submission => 13,
            ErrorKind::ConfirmationTimeout => 14,
            ErrorKind::UnexpectedState => 15,
        }
    }
}

impl From<ErrorKind> for ExitCode {
    fn from(kind: ErrorKind) -> Self {
        ExitCode::from(kind.exit_status())
    }
}

/// Error of a single puzzle run.
#[derive(Error)]
pub enum PuzzleError {
    #[error("{code} Invalid configuration: {0}", code = self.code())]
    Config(String),

    #[error("{code} Read failed: {0}", code = self.code())]
    Read(#[from] ReadError),

    #[error("{code} Scan exhausted after {attempts} attempts", code = self.code())]
    Exhausted { attempts: u64 },

    #[error("{code} Submission failed: {0}", code = self.code())]
    Submit(#[from] SubmitError),

    #[error("{code} Selector derivation failed: {0}", code = self.code())]
    Selector(#[from] SelectorError),

    #[error("{code} Unexpected on-chain state: {0}", code = self.code())]
    UnexpectedState(String),

    #[error("{code} Invalid stage transition {from:?} -> {to:?}", code = self.code())]
    InvalidTransition { from: Stage, to: Stage },
}

impl_coded_debug!(PuzzleError);

impl CodedError for PuzzleError {
    fn code(&self) -> &str {
        match self {
            PuzzleError::Config(_) => "[HH-PZ-002]",
            PuzzleError::Read(err) => err.code(),
            PuzzleError::Exhausted { .. } => "[HH-SC-001]",
            PuzzleError::Submit(err) => err.code(),
            PuzzleError::Selector(err) => err.code(),
            PuzzleError::UnexpectedState(_) => "[HH-PZ-003]",
            PuzzleError::InvalidTransition { .. } => "[HH-PZ-500]",
        }
    }
}

impl PuzzleError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PuzzleError::Config(_) => ErrorKind::Config,
            PuzzleError::Read(err) => err.kind(),
            PuzzleError::Exhausted { .. } => ErrorKind::Exhausted,
            PuzzleError::Submit(err) => err.kind(),
            PuzzleError::Selector(_) => ErrorKind::Config,
            PuzzleError::UnexpectedState(_) => ErrorKind::UnexpectedState,
            PuzzleError::InvalidTransition { .. } => ErrorKind::Unexpected,
        }
    }
}

impl From<ScanError> for PuzzleError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Exhausted { attempts } => PuzzleError::Exhausted { attempts },
            ScanError::Read(err) => PuzzleError::Read(err),
        }
    }
}

impl ErrorKind {
    /// Kind of an error that reached the binary edge. Errors that carry no kind are
    /// [ErrorKind::Unexpected].
    pub fn of(err: &anyhow::Error) -> Self {
        if let Some(failure) = err.downcast_ref::<PuzzleFailure>() {
            failure.kind()
        } else if let Some(err) = err.downcast_ref::<PuzzleError>() {
            err.kind()
        } else {
            ErrorKind::Unexpected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_statuses_are_distinct() {
        let kinds = [
            ErrorKind::Config,
            ErrorKind::Connectivity,
            ErrorKind::Decode,
            ErrorKind::Exhausted,
            ErrorKind::Submission,
            ErrorKind::ConfirmationTimeout,
            ErrorKind::UnexpectedState,
            ErrorKind::Unexpected,
        ];
        let mut statuses: Vec<u8> = kinds.iter().map(|kind| kind.exit_status()).collect();
        statuses.sort_unstable();
        statuses.dedup();
        assert_eq!(statuses.len(), kinds.len());
        assert!(!statuses.contains(&0));
    }

    #[test]
    fn scan_errors_keep_their_kind() {
        let err = PuzzleError::from(ScanError::Exhausted { attempts: 7 });
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert!(err.to_string().starts_with("[HH-SC-001]"));
        assert!(err.to_string().contains("7 attempts"));
    }

    #[test]
    fn config_error_exits_with_two() {
        let err = PuzzleError::Config("missing --target".into());
        assert_eq!(err.kind().exit_status(), 2);
        assert!(format!("{err:?}").contains("missing --target"));
    }

    #[test]
    fn malformed_signature_is_a_config_error() {
        let err = PuzzleError::from(crate::selector::selector("not a ( signature").unwrap_err());
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(ErrorKind::of(&err.into()), ErrorKind::Config);
    }

    #[test]
    fn kind_survives_anyhow() {
        let err = anyhow::Error::from(PuzzleError::UnexpectedState("counter is 9".into()));
        assert_eq!(ErrorKind::of(&err), ErrorKind::UnexpectedState);

        let failure = PuzzleFailure {
            puzzle: crate::Puzzle::M4,
            stage: Stage::Scanning,
            error: PuzzleError::Exhausted { attempts: 3 },
            records: vec![],
        };
        assert_eq!(ErrorKind::of(&failure.into()), ErrorKind::Exhausted);
        assert_eq!(ErrorKind::of(&anyhow::anyhow!("boom")), ErrorKind::Unexpected);
    }
}
