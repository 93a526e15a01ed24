// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Version | Options | Inis | InternalCandidate | Candidate | Promote | Strip
//! ```

use std::process::ExitCode;

use unity_release::cli::global::GlobalOptions;
use unity_release::cli::{self, Command};
use unity_release::cmd::config::{run_inis_command, run_options_command};
use unity_release::cmd::release::{
    run_candidate_command, run_internal_candidate_command, run_promote_command,
};
use unity_release::cmd::strip::run_strip_command;
use unity_release::config::Config;
use unity_release::config::loader::ConfigLoader;
use unity_release::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let command = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Some(Command::Inis) => {
            match build_config_loader(&cli.global) {
                Ok(loader) => run_inis_command(&loader),
                Err(e) => return fail(&e),
            }
            return ExitCode::SUCCESS;
        }
        Some(command) => command,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
    };

    let config = match build_config_loader(&cli.global).and_then(ConfigLoader::build) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch_command(command, &config, &cli.global).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {e:#}");
    ExitCode::FAILURE
}

fn build_log_config(config: &Config) -> LogConfig {
    let global = &config.global;
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json_file(global.json_log)
        .build()
}

async fn dispatch_command(
    command: &Command,
    config: &Config,
    global: &GlobalOptions,
) -> unity_release::error::Result<()> {
    match command {
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::InternalCandidate(args) => {
            run_internal_candidate_command(args, config, global.yes).await
        }
        Command::Candidate(args) => run_candidate_command(args, config, global.yes).await,
        Command::Promote(args) => run_promote_command(args, config, global.yes).await,
        Command::Strip(args) => run_strip_command(args, config, global.yes),
        // handled before the configuration is loaded
        Command::Version | Command::Inis => Ok(()),
    }
}

fn build_config_loader(global: &GlobalOptions) -> unity_release::error::Result<ConfigLoader> {
    ConfigLoader::layered(&global.inis, global.to_config_overrides())
}
