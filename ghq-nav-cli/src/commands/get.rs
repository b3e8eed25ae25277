//! Get command - clone a repository with `ghq get`

use std::path::PathBuf;

use clap::Args;
use ghq_nav_core::{CommandId, Config};

use super::run_palette_command;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// File whose package's upstream repository pre-fills the URL prompt
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl GetArgs {
    /// Execute the get command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let file = match &self.file {
            Some(path) if path.is_relative() => Some(std::env::current_dir()?.join(path)),
            other => other.clone(),
        };

        run_palette_command(CommandId::GetRepositoryByUrl, config, file).await
    }
}
