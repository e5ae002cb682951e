//! `retrier exec -- CMD...` – rerun a command until it exits 0.

use anyhow::{Context, Result};
use retrier_core::{retrier, PolicyDescriptor};
use tokio::process::Command;

pub async fn run_exec(descriptor: PolicyDescriptor<String>, command: &[String]) -> Result<()> {
    let (program, args) = command.split_first().context("no command given")?;

    let subject = || {
        let mut cmd = Command::new(program);
        cmd.args(args);
        async move {
            match cmd.status().await {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(format!("`{}` exited with {}", program, status)),
                Err(e) => Err(format!("could not run `{}`: {}", program, e)),
            }
        }
    };

    // Bind before returning: the run future borrows `program` and `args`.
    let result = retrier(subject, descriptor)?.await;
    result.map_err(|reason| anyhow::anyhow!(reason))
}
