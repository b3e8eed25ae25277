//! Repository discovery through ghq

use std::path::{Path, PathBuf};

use crate::config::Tools;
use crate::shell::{CommandLine, CommandRunner};
use crate::Result;

/// A repository registered with ghq
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Path relative to the ghq root (e.g. `github.com/owner/name`)
    pub label: String,
}

impl Repository {
    /// Create a repository from its relative path
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// A tracked file inside a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name without directories
    pub label: String,
    /// Path relative to the repository root
    pub description: String,
    /// Absolute path on disk
    pub path: PathBuf,
}

impl FileEntry {
    fn from_listing(repository_path: &Path, line: &str) -> Self {
        let label = line.rsplit('/').next().unwrap_or(line).to_string();
        Self {
            label,
            description: line.to_string(),
            path: repository_path.join(line),
        }
    }
}

/// Answers questions about the ghq root and its repositories
#[derive(Debug)]
pub struct RepositoryLocator<R> {
    runner: R,
    tools: Tools,
}

impl<R: CommandRunner> RepositoryLocator<R> {
    /// Create a locator running commands through `runner`
    pub fn new(runner: R, tools: Tools) -> Self {
        Self { runner, tools }
    }

    /// Access the underlying command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `ghq root`
    ///
    /// Fails when ghq is missing or errors out.
    pub async fn root(&self) -> Result<PathBuf> {
        let stdout = self
            .runner
            .run(&CommandLine::new(&self.tools.ghq).arg("root"), None)
            .await?;
        Ok(PathBuf::from(stdout.trim()))
    }

    /// The ghq root, or `None` when it cannot be determined
    pub async fn get_root(&self) -> Option<PathBuf> {
        match self.root().await {
            Ok(root) if !root.as_os_str().is_empty() => Some(root),
            Ok(_) => {
                tracing::debug!("ghq root printed nothing");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "ghq root unavailable");
                None
            }
        }
    }

    /// Absolute path of a repository given its relative path
    pub async fn repository_path(&self, relative: &str) -> Option<PathBuf> {
        self.get_root().await.map(|root| root.join(relative))
    }

    /// List registered repositories in the order ghq prints them
    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let stdout = self
            .runner
            .run(&CommandLine::new(&self.tools.ghq).arg("list"), None)
            .await?;

        Ok(non_empty_lines(&stdout).map(Repository::new).collect())
    }

    /// List files tracked by git in a repository
    ///
    /// Returns an empty list when the ghq root is unknown.
    pub async fn list_files(&self, relative: &str) -> Result<Vec<FileEntry>> {
        let Some(repository_path) = self.repository_path(relative).await else {
            return Ok(Vec::new());
        };

        let stdout = self
            .runner
            .run(
                &CommandLine::new(&self.tools.git).arg("ls-files"),
                Some(&repository_path),
            )
            .await?;

        Ok(non_empty_lines(&stdout)
            .map(|line| FileEntry::from_listing(&repository_path, line))
            .collect())
    }

    /// Run `ghq get <input>` and return its trimmed output
    ///
    /// The input is split on whitespace, so flags such as `-p` or
    /// `--shallow` reach ghq as separate arguments.
    pub async fn get_repository(&self, input: &str) -> Result<String> {
        let stdout = self.runner.run(&self.get_command(input), None).await?;
        Ok(stdout.trim().to_string())
    }

    fn get_command(&self, input: &str) -> CommandLine {
        CommandLine::new(&self.tools.ghq)
            .arg("get")
            .args(input.split_whitespace())
    }
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.is_empty())
}
