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

use std::process::ExitCode;

use clap::Parser;
use hackerhouse::{commands::Command, display::DisplayManager, ErrorKind, PuzzleFailure};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solvers for the SmartCon 2022 Hacker House NFT puzzles")]
struct MainArgs {
    #[command(subcommand)]
    command: Command,

    /// Log in JSON format.
    #[clap(long, env, global = true)]
    log_json: bool,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so that .env can provide RPC_URL, PRIVATE_KEY and friends.
    let dotenv = dotenvy::dotenv();

    let args = MainArgs::parse();
    init_tracing(args.log_json);

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment variables from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => {
            tracing::error!("Failed to load .env file: {e}");
            return ErrorKind::Config.into();
        }
    }

    match args.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Failed runs were already printed with their stage and transactions.
            if err.downcast_ref::<PuzzleFailure>().is_none() {
                DisplayManager::new().error(&format!("{err:#}"));
            }
            let kind = ErrorKind::of(&err);
            tracing::debug!("Exiting with {kind:?} ({})", kind.exit_status());
            kind.into()
        }
    }
}
