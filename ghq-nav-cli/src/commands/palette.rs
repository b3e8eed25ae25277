//! Palette commands - the interactive repository flows

use std::path::PathBuf;
use std::sync::Arc;

use ghq_nav_core::{CommandId, Config, Extension, ShellRunner};

use crate::terminal::TerminalHost;

/// Activate against the terminal host and run one palette command
///
/// Fails when ghq is unavailable; the host has already printed the warning
/// by then.
pub async fn run_palette_command(
    id: CommandId,
    config: &Config,
    active_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let runner = Arc::new(ShellRunner::new());
    let host =
        TerminalHost::new(runner.clone(), config.editor.clone()).with_active_file(active_file);

    let Some(extension) = Extension::activate(runner, config.tools.clone(), host).await else {
        anyhow::bail!("ghq root could not be determined (is ghq on PATH?)");
    };

    tracing::debug!(command = %id, "Running palette command");
    let result = extension.execute(id).await;
    extension.deactivate();

    result.map_err(anyhow::Error::from)
}
