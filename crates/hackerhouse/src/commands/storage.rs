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

use alloy::primitives::{Address, B256, U256};
use clap::Args;
use colored::Colorize;

use crate::{
    config::EndpointConfig,
    display::{network_name, DisplayManager},
    errors::PuzzleError,
    reader::{self, ChainReader},
};

/// Command to dump raw storage slots, e.g. to find where a contract keeps a helper address.
#[derive(Args, Clone, Debug)]
pub struct DumpStorage {
    /// Contract to inspect.
    pub address: Address,

    /// First slot to read.
    #[clap(long, default_value_t = 0)]
    pub from: u64,

    /// Number of consecutive slots to read.
    #[clap(long, default_value_t = 10)]
    pub count: u64,

    #[clap(flatten, next_help_heading = "Chain")]
    pub endpoint: EndpointConfig,
}

impl DumpStorage {
    /// Run the [DumpStorage] command.
    pub async fn run(&self) -> anyhow::Result<()> {
        let (endpoint, reader) = self.endpoint.connect_reader().await?;

        let display = DisplayManager::with_network(network_name(endpoint.chain_id));
        display.header(&format!("Storage of {:#x}", self.address));
        for (slot, word) in dump_slots(&reader, self.address, self.from, self.count).await? {
            let label = format!("Slot {slot}");
            if word.is_zero() {
                display.item(&label, word.to_string().dimmed());
            } else {
                display.item(&label, word);
            }
        }
        Ok(())
    }
}

/// Reads `count` consecutive slots of `address` starting at `from`, in order.
pub async fn dump_slots<R>(
    reader: &R,
    address: Address,
    from: u64,
    count: u64,
) -> Result<Vec<(u64, B256)>, PuzzleError>
where
    R: ChainReader + ?Sized,
{
    let mut slots = Vec::new();
    for slot in from..from.saturating_add(count) {
        let word = reader::read_slot(reader, address, U256::from(slot)).await?;
        slots.push((slot, word));
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockChain, MockEvent};

    #[tokio::test]
    async fn dumps_consecutive_slots() {
        let contract = Address::repeat_byte(0x64);
        let chain = MockChain::new().with_storage(contract, U256::from(8), B256::repeat_byte(0x11));

        let slots = dump_slots(&chain, contract, 7, 3).await.unwrap();

        assert_eq!(
            slots,
            vec![(7, B256::ZERO), (8, B256::repeat_byte(0x11)), (9, B256::ZERO)]
        );
        assert_eq!(
            chain.all_events(),
            (7u64..10).map(|slot| MockEvent::StorageRead(contract, U256::from(slot))).collect::<Vec<_>>()
        );
    }
}
