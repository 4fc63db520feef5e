use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap_complete::{generate, generate_to, Shell};
use tracing::info;

use grisk_cli::cli::build_cli_command;

const BIN_NAME: &str = "grisk";

/// Print the completion script for `shell`, or write it into `dir` under the
/// file name the shell expects (`grisk.bash`, `_grisk`, `grisk.fish`, ...).
pub fn handle(shell: Shell, dir: Option<&Path>) -> Result<()> {
    let mut cmd = build_cli_command();
    let Some(dir) = dir else {
        generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
        return Ok(());
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating completion directory {}", dir.display()))?;
    let path = generate_to(shell, &mut cmd, BIN_NAME, dir)
        .with_context(|| format!("writing {shell} completion into {}", dir.display()))?;
    info!(path = %path.display(), "completion script written");
    println!("Wrote {shell} completion to {}", path.display());
    Ok(())
}
