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

//! Function selector utility functions.

use alloy::{json_abi::Function, primitives::Selector};
use thiserror::Error;

use crate::{errors::CodedError, impl_coded_debug};

#[derive(Error)]
pub enum SelectorError {
    #[error("{code} Invalid function signature {signature:?}: {source}", code = self.code())]
    InvalidSignature {
        signature: String,
        #[source]
        source: alloy::json_abi::parser::Error,
    },
}

impl_coded_debug!(SelectorError);

impl CodedError for SelectorError {
    fn code(&self) -> &str {
        match self {
            SelectorError::InvalidSignature { .. } => "[HH-SL-001]",
        }
    }
}

/// Parses a human-readable signature such as `callMeZero(uint256,address)` or
/// `function callMeZero(uint256 someNumber, address someAddress)`.
pub fn parse_signature(signature: &str) -> Result<Function, SelectorError> {
    Function::parse(signature).map_err(|source| SelectorError::InvalidSignature {
        signature: signature.to_string(),
        source,
    })
}

/// Canonical form of a signature: name and parameter types, no names or spaces.
pub fn canonical_signature(signature: &str) -> Result<String, SelectorError> {
    Ok(parse_signature(signature)?.signature())
}

/// The 4-byte selector of a function: the first 4 bytes of the keccak256 hash of its canonical
/// signature.
pub fn selector(signature: &str) -> Result<Selector, SelectorError> {
    Ok(parse_signature(signature)?.selector())
}

#[cfg(test)]
mod tests {
    use alloy::{primitives::fixed_bytes, sol, sol_types::SolCall};

    use super::*;

    sol! {
        interface IHelper {
            function callMeZero(uint256 someNumber, address someAddress) external;
            function getNumberOne() external payable;
        }
    }

    #[test]
    fn deterministic_and_idempotent() {
        let first = selector("callMeZero(uint256,address)").unwrap();
        let second = selector("callMeZero(uint256,address)").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Selector::from(IHelper::callMeZeroCall::SELECTOR));
    }

    #[test]
    fn parameter_names_do_not_change_the_selector() {
        assert_eq!(
            selector("function callMeZero(uint256 someNumber, address someAddress)").unwrap(),
            selector("callMeZero(uint256,address)").unwrap(),
        );
        assert_eq!(
            canonical_signature("function callMeZero(uint256 someNumber, address someAddress)")
                .unwrap(),
            "callMeZero(uint256,address)"
        );
    }

    #[test]
    fn known_selectors() {
        assert_eq!(selector("transfer(address,uint256)").unwrap(), fixed_bytes!("a9059cbb"));
        assert_eq!(
            selector("getNumberOne()").unwrap(),
            Selector::from(IHelper::getNumberOneCall::SELECTOR)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = selector("not a signature(").unwrap_err();
        assert!(err.to_string().starts_with("[HH-SL-001]"));
    }
}
