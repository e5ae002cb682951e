//! CLI for the retrier orchestrator.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use retrier_core::config::RetrierConfig;
use retrier_core::PolicyDescriptor;

use commands::{run_completions, run_demo, run_exec, run_man, run_policies};

/// Top-level CLI for retrier.
#[derive(Debug, Parser)]
#[command(name = "retrier")]
#[command(about = "Retry an operation under a named, parameterized policy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a simulated operation that fails N times, then succeeds.
    Demo {
        /// Number of failures before the simulated operation succeeds.
        #[arg(long, default_value = "3", value_name = "N")]
        failures: u32,
        /// Policy descriptor as JSON, e.g. '{"constantDelay":{"delay":100,"maxRetries":3}}'.
        #[arg(long, value_name = "JSON")]
        policy: Option<String>,
    },

    /// Run a command, retrying while it exits non-zero.
    Exec {
        /// Policy descriptor as JSON (default: `default_policy` from config).
        #[arg(long, value_name = "JSON")]
        policy: Option<String>,
        /// Program and arguments to run.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// List registered retry policies and their parameters.
    Policies,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run(self, cfg: &RetrierConfig) -> Result<()> {
        match self {
            CliCommand::Demo { failures, policy } => {
                run_demo(descriptor(policy.as_deref(), cfg)?, failures).await?
            }
            CliCommand::Exec { policy, command } => {
                run_exec(descriptor(policy.as_deref(), cfg)?, &command).await?
            }
            CliCommand::Policies => run_policies(),
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }
        Ok(())
    }
}

/// `--policy` JSON when given, else the configured default.
fn descriptor<E>(policy: Option<&str>, cfg: &RetrierConfig) -> Result<PolicyDescriptor<E>> {
    match policy {
        Some(text) => PolicyDescriptor::from_json(text).context("parsing --policy JSON"),
        None => Ok(PolicyDescriptor::from(cfg.default_policy.clone())),
    }
}

#[cfg(test)]
mod tests;
