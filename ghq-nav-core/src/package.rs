//! Upstream repository lookup for installed packages
//!
//! A file living under `node_modules` or a gem directory belongs to a
//! package whose metadata usually names its source repository. This module
//! detects the package from the path and asks the ecosystem's own tooling
//! for that URL.

use std::path::{Path, PathBuf};

use crate::config::Tools;
use crate::shell::{CommandLine, CommandRunner};
use crate::Result;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    /// npm packages under `node_modules`
    Npm,
    /// Ruby gems under a `gems` directory
    Gem,
}

impl Ecosystem {
    /// Detect the ecosystem owning a file path
    ///
    /// npm wins when both markers appear.
    pub fn detect(path: &str) -> Option<Self> {
        [Self::Npm, Self::Gem]
            .into_iter()
            .find(|ecosystem| path.contains(ecosystem.marker()))
    }

    /// Path segment identifying files of this ecosystem
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Npm => "/node_modules/",
            Self::Gem => "/gems/",
        }
    }

    /// Get the name of the ecosystem
    pub fn name(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Gem => "gem",
        }
    }

    /// Extract the package name from a path containing this ecosystem's marker
    pub fn package_name(&self, path: &str) -> Option<String> {
        match self {
            Self::Npm => {
                let (_, rest) = path.split_once(self.marker())?;
                let mut segments = rest.split('/');
                let first = segments.next().filter(|s| !s.is_empty())?;
                let second = segments.next().filter(|s| !s.is_empty())?;

                if first.starts_with('@') {
                    Some(format!("{}/{}", first, second))
                } else {
                    Some(first.to_string())
                }
            }
            // Only the first marker counts, so
            // `<prefix>/gems/<ruby-version>/gems/<name>-<version>` has no name.
            Self::Gem => path
                .split_once(self.marker())
                .and_then(|(_, rest)| gem_name(rest)),
        }
    }

    /// Command printing the package's repository metadata
    fn metadata_command(&self, tools: &Tools, package: &str) -> CommandLine {
        match self {
            Self::Npm => CommandLine::new(&tools.npm).args(["view", package, "repository.url"]),
            Self::Gem => {
                CommandLine::new(&tools.gem).args(["specification", "-r", package, "metadata"])
            }
        }
    }

    /// Pull the repository URL out of the metadata command's output
    fn parse_repository_url(&self, stdout: &str) -> Option<String> {
        match self {
            Self::Npm => {
                // "git+https://github.com/owner/repo.git"
                let (_, url) = stdout.trim().split_once('+')?;
                (!url.is_empty()).then(|| url.to_string())
            }
            Self::Gem => {
                // "source_code_uri: https://github.com/owner/repo"
                let line = stdout
                    .lines()
                    .map(str::trim)
                    .find(|line| line.contains("source_code_uri"))?;
                let (_, url) = line.split_once(' ')?;
                let url = url.trim();
                (!url.is_empty()).then(|| url.to_string())
            }
        }
    }
}

/// `name-with-dashes-1.2.3/lib/...` -> `name-with-dashes`
fn gem_name(rest: &str) -> Option<String> {
    let dir = rest.split('/').next().filter(|s| !s.is_empty())?;
    let (name, _version) = dir.rsplit_once('-')?;
    (!name.is_empty()).then(|| name.to_string())
}

/// A package detected from a file path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// The path the package was detected from
    pub file_path: PathBuf,
    /// Ecosystem owning the package
    pub ecosystem: Ecosystem,
    /// Package name, when the path has the expected shape
    pub package_name: Option<String>,
}

impl PackageDescriptor {
    /// Build a descriptor if the path lies inside a known package directory
    pub fn detect(file_path: impl AsRef<Path>) -> Option<Self> {
        let file_path = file_path.as_ref();
        let path = file_path.to_string_lossy();
        let ecosystem = Ecosystem::detect(&path)?;

        Some(Self {
            file_path: file_path.to_path_buf(),
            ecosystem,
            package_name: ecosystem.package_name(&path),
        })
    }
}

/// Resolves upstream repository URLs for installed packages
#[derive(Debug)]
pub struct PackageResolver<R> {
    runner: R,
    tools: Tools,
}

impl<R: CommandRunner> PackageResolver<R> {
    /// Create a resolver running metadata queries through `runner`
    pub fn new(runner: R, tools: Tools) -> Self {
        Self { runner, tools }
    }

    /// Query the ecosystem for the package's repository URL
    ///
    /// `Ok(None)` means the package has no name or no usable URL; errors
    /// come from the metadata command itself.
    pub async fn lookup(&self, package: &PackageDescriptor) -> Result<Option<String>> {
        let Some(name) = package.package_name.as_deref() else {
            return Ok(None);
        };

        let command = package.ecosystem.metadata_command(&self.tools, name);
        let stdout = self.runner.run(&command, None).await?;

        Ok(package.ecosystem.parse_repository_url(&stdout))
    }

    /// Best-effort repository URL for the package owning `file_path`
    ///
    /// Never fails: unknown paths, unnamed packages and failed lookups all
    /// yield `None`.
    pub async fn resolve_repository_url(&self, file_path: impl AsRef<Path>) -> Option<String> {
        let package = PackageDescriptor::detect(file_path)?;

        match self.lookup(&package).await {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(
                    ecosystem = package.ecosystem.name(),
                    package = ?package.package_name,
                    error = %e,
                    "Repository URL lookup failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    fn resolver(runner: ScriptedRunner) -> PackageResolver<ScriptedRunner> {
        PackageResolver::new(runner, Tools::default())
    }

    fn name_of(path: &str) -> Option<String> {
        PackageDescriptor::detect(path).and_then(|d| d.package_name)
    }

    #[test]
    fn test_detect_ecosystem() {
        assert_eq!(
            Ecosystem::detect("/app/node_modules/left-pad/index.js"),
            Some(Ecosystem::Npm)
        );
        assert_eq!(
            Ecosystem::detect("/usr/lib/ruby/gems/3.2.0/gems/rake-13.0.6/lib/rake.rb"),
            Some(Ecosystem::Gem)
        );
        assert_eq!(Ecosystem::detect("/home/me/src/main.rs"), None);
    }

    #[test]
    fn test_npm_scoped_package() {
        assert_eq!(
            name_of("/app/node_modules/@scope/pkg/lib/index.js"),
            Some("@scope/pkg".to_string())
        );
    }

    #[test]
    fn test_npm_unscoped_package() {
        assert_eq!(
            name_of("/app/node_modules/pkg/index.js"),
            Some("pkg".to_string())
        );
    }

    #[test]
    fn test_npm_marker_at_end() {
        let descriptor = PackageDescriptor::detect("/app/node_modules/").unwrap();
        assert_eq!(descriptor.ecosystem, Ecosystem::Npm);
        assert_eq!(descriptor.package_name, None);
    }

    #[test]
    fn test_npm_scope_without_name() {
        assert_eq!(name_of("/app/node_modules/@scope"), None);
        assert_eq!(name_of("/app/node_modules/pkg"), None);
    }

    #[test]
    fn test_npm_nested_takes_outermost_package() {
        assert_eq!(
            name_of("/app/node_modules/outer/node_modules/inner/index.js"),
            Some("outer".to_string())
        );
    }

    #[test]
    fn test_gem_drops_version() {
        assert_eq!(
            name_of("/var/lib/gems/pkg-name-1.2.3/lib/pkg.rb"),
            Some("pkg-name".to_string())
        );
        assert_eq!(
            name_of("/home/me/.gem/gems/rails-7.1.0/README.md"),
            Some("rails".to_string())
        );
    }

    #[test]
    fn test_gem_without_hyphen_has_no_name() {
        assert_eq!(name_of("/opt/gems/1.2.3/lib/x.rb"), None);
        assert_eq!(name_of("/opt/gems/rake/lib/x.rb"), None);
    }

    #[test]
    fn test_gem_name_comes_from_first_marker_only() {
        assert_eq!(
            name_of("/usr/lib/ruby/gems/3.2.0/gems/rake-13.0.6/lib/rake.rb"),
            None
        );
        assert_eq!(
            name_of("/opt/gems/rake-13.0.6/gems/other-1.0.0/lib/x.rb"),
            Some("rake".to_string())
        );
    }

    #[test]
    fn test_gem_marker_at_end() {
        assert_eq!(name_of("/opt/gems/"), None);
    }

    #[test]
    fn test_unrelated_path_has_no_descriptor() {
        assert!(PackageDescriptor::detect("/home/me/project/src/gems.rs").is_none());
    }

    #[test]
    fn test_parse_npm_url() {
        assert_eq!(
            Ecosystem::Npm.parse_repository_url("git+https://github.com/owner/repo.git\n"),
            Some("https://github.com/owner/repo.git".to_string())
        );
        assert_eq!(
            Ecosystem::Npm.parse_repository_url("https://github.com/owner/repo\n"),
            None
        );
        assert_eq!(Ecosystem::Npm.parse_repository_url("git+\n"), None);
        assert_eq!(Ecosystem::Npm.parse_repository_url(""), None);
    }

    #[test]
    fn test_parse_gem_url() {
        let stdout = "---\n  homepage_uri: https://example.com\n  source_code_uri: https://github.com/owner/gem\n";
        assert_eq!(
            Ecosystem::Gem.parse_repository_url(stdout),
            Some("https://github.com/owner/gem".to_string())
        );
        assert_eq!(
            Ecosystem::Gem.parse_repository_url("homepage_uri: https://example.com\n"),
            None
        );
        assert_eq!(Ecosystem::Gem.parse_repository_url("   \n"), None);
    }

    #[tokio::test]
    async fn test_resolve_npm_url() {
        let resolver = resolver(ScriptedRunner::new().respond(
            "npm view @scope/pkg repository.url",
            "git+https://github.com/scope/pkg.git\n",
        ));
        let url = resolver
            .resolve_repository_url("/app/node_modules/@scope/pkg/index.js")
            .await;
        assert_eq!(url, Some("https://github.com/scope/pkg.git".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_gem_url() {
        let resolver = resolver(ScriptedRunner::new().respond(
            "gem specification -r pkg-name metadata",
            "---\nsource_code_uri: https://github.com/owner/pkg-name\n",
        ));
        let url = resolver
            .resolve_repository_url("/opt/gems/pkg-name-1.2.3/lib/a.rb")
            .await;
        assert_eq!(url, Some("https://github.com/owner/pkg-name".to_string()));
    }

    #[tokio::test]
    async fn test_gem_lookup_failure_is_absent() {
        let resolver = resolver(
            ScriptedRunner::new().fail("gem specification -r missing metadata", "not found"),
        );
        let path = "/opt/gems/missing-0.1.0/lib/a.rb";

        let package = PackageDescriptor::detect(path).unwrap();
        assert!(resolver.lookup(&package).await.is_err());
        assert_eq!(resolver.resolve_repository_url(path).await, None);
    }

    #[tokio::test]
    async fn test_npm_lookup_failure_is_absent() {
        let resolver =
            resolver(ScriptedRunner::new().fail("npm view ghost repository.url", "E404"));
        let url = resolver
            .resolve_repository_url("/app/node_modules/ghost/index.js")
            .await;
        assert_eq!(url, None);
    }

    #[tokio::test]
    async fn test_unrelated_path_runs_nothing() {
        let resolver = resolver(ScriptedRunner::new());
        assert_eq!(
            resolver.resolve_repository_url("/home/me/src/main.rs").await,
            None
        );
        assert!(resolver.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unnamed_package_runs_nothing() {
        let resolver = resolver(ScriptedRunner::new());
        assert_eq!(
            resolver.resolve_repository_url("/app/node_modules/").await,
            None
        );
        assert!(resolver.runner.calls().is_empty());
    }
}
