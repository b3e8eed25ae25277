//! Non-interactive queries: repository list, root, package URL

use std::path::PathBuf;

use clap::Args;
use ghq_nav_core::{Config, PackageDescriptor, PackageResolver, RepositoryLocator, ShellRunner};

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print absolute paths instead of paths relative to the ghq root
    #[arg(short = 'p', long)]
    pub full_path: bool,

    /// Only show repositories containing this text
    pub query: Option<String>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let locator = RepositoryLocator::new(ShellRunner::new(), config.tools.clone());
        let repositories = locator.list_repositories().await?;

        let root = if self.full_path {
            Some(
                locator
                    .get_root()
                    .await
                    .ok_or_else(|| anyhow::anyhow!("ghq root could not be determined"))?,
            )
        } else {
            None
        };

        for repository in repositories {
            if let Some(query) = &self.query {
                if !repository.label.contains(query.as_str()) {
                    continue;
                }
            }

            match &root {
                Some(root) => println!("{}", root.join(&repository.label).display()),
                None => println!("{}", repository.label),
            }
        }

        Ok(())
    }
}

/// Print the ghq root
pub async fn show_root(config: &Config) -> anyhow::Result<()> {
    let locator = RepositoryLocator::new(ShellRunner::new(), config.tools.clone());
    let root = locator.root().await?;
    println!("{}", root.display());
    Ok(())
}

/// Arguments for the resolve-url command
#[derive(Args, Debug)]
pub struct ResolveUrlArgs {
    /// A file inside node_modules or an installed gem
    pub path: PathBuf,
}

impl ResolveUrlArgs {
    /// Execute the resolve-url command
    ///
    /// Prints nothing when the path has no resolvable upstream repository.
    pub async fn execute(&self, config: &Config, verbose: bool) -> anyhow::Result<()> {
        let path = if self.path.is_relative() {
            std::env::current_dir()?.join(&self.path)
        } else {
            self.path.clone()
        };

        if verbose {
            match PackageDescriptor::detect(&path) {
                Some(package) => tracing::info!(
                    ecosystem = package.ecosystem.name(),
                    package = ?package.package_name,
                    "Package detected"
                ),
                None => tracing::info!(path = %path.display(), "Not inside a package directory"),
            }
        }

        let resolver = PackageResolver::new(ShellRunner::new(), config.tools.clone());
        if let Some(url) = resolver.resolve_repository_url(&path).await {
            println!("{}", url);
        }

        Ok(())
    }
}
