//! ghq-nav Core - browse, open, and fetch ghq-managed repositories
//!
//! This crate turns the output of `ghq`, `git`, `npm`, and `gem` into
//! selection flows that an editor-like host presents to the user.

pub mod config;
pub mod error;
pub mod extension;
pub mod flow;
pub mod host;
pub mod locator;
pub mod package;
pub mod shell;

#[cfg(test)]
mod testing;

pub use config::{Config, EditorConfig, Tools};
pub use error::{Error, Result};
pub use extension::{CommandId, Extension, NOT_INSTALLED_WARNING};
pub use flow::{web_url, SelectionFlow};
pub use host::{Host, InputBoxOptions, PickEvent, ProgressOptions, QuickPick, QuickPickItem};
pub use locator::{FileEntry, Repository, RepositoryLocator};
pub use package::{Ecosystem, PackageDescriptor, PackageResolver};
pub use shell::{CommandLine, CommandRunner, ShellRunner};
