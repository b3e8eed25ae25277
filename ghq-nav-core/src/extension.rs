//! Activation context and the command palette entries it registers

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::config::Tools;
use crate::flow::SelectionFlow;
use crate::host::Host;
use crate::shell::CommandRunner;
use crate::{Error, Result};

/// Warning shown when ghq cannot be found at activation
pub const NOT_INSTALLED_WARNING: &str = "ghq is not installed.";

/// Commands exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandId {
    Open,
    OpenInNewWindow,
    OpenInBrowser,
    AddToWorkspace,
    OpenFileInCurrentWindow,
    GetRepositoryByUrl,
}

impl CommandId {
    /// Every command, in palette order
    pub const ALL: [CommandId; 6] = [
        Self::Open,
        Self::OpenInNewWindow,
        Self::OpenInBrowser,
        Self::AddToWorkspace,
        Self::OpenFileInCurrentWindow,
        Self::GetRepositoryByUrl,
    ];

    /// Identifier used to register the command with the host
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "ghq.open",
            Self::OpenInNewWindow => "ghq.openInNewWindow",
            Self::OpenInBrowser => "ghq.openInBrowser",
            Self::AddToWorkspace => "ghq.addToWorkSpace",
            Self::OpenFileInCurrentWindow => "ghq.openFileInCurrentWindow",
            Self::GetRepositoryByUrl => "ghq.get",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

/// Commands registered for the lifetime of one activation
pub struct Extension<R, H> {
    flow: SelectionFlow<R, H>,
    registered: BTreeSet<CommandId>,
}

impl<R, H> fmt::Debug for Extension<R, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner + Clone, H: Host> Extension<R, H> {
    /// Activate against a host
    ///
    /// When the ghq root cannot be found the host is warned once and
    /// `None` is returned: nothing is registered.
    pub async fn activate(runner: R, tools: Tools, host: H) -> Option<Self> {
        let flow = SelectionFlow::new(runner, tools, host);

        if flow.locator().get_root().await.is_none() {
            tracing::warn!("ghq root not found, no commands registered");
            flow.host().show_warning_message(NOT_INSTALLED_WARNING).await;
            return None;
        }

        let registered: BTreeSet<_> = CommandId::ALL.into_iter().collect();
        tracing::debug!(count = registered.len(), "Commands registered");

        Some(Self { flow, registered })
    }
}

impl<R: CommandRunner, H: Host> Extension<R, H> {
    /// Commands available in this activation
    pub fn registered_commands(&self) -> impl Iterator<Item = CommandId> + '_ {
        self.registered.iter().copied()
    }

    /// The flow controller behind the commands
    pub fn flow(&self) -> &SelectionFlow<R, H> {
        &self.flow
    }

    /// Run a registered command
    pub async fn execute(&self, id: CommandId) -> Result<()> {
        if !self.registered.contains(&id) {
            return Err(Error::UnknownCommand(id.to_string()));
        }

        tracing::debug!(command = %id, "Executing command");
        match id {
            CommandId::Open => self.flow.open(false).await,
            CommandId::OpenInNewWindow => self.flow.open(true).await,
            CommandId::OpenInBrowser => self.flow.open_in_browser().await,
            CommandId::AddToWorkspace => self.flow.add_to_workspace().await,
            CommandId::OpenFileInCurrentWindow => self.flow.open_file_in_current_window().await,
            CommandId::GetRepositoryByUrl => self.flow.get_repository_by_url().await,
        }
    }

    /// Run a command by its registered name
    pub async fn execute_named(&self, name: &str) -> Result<()> {
        self.execute(name.parse()?).await
    }

    /// Tear down the activation, releasing every registration
    pub fn deactivate(mut self) {
        tracing::debug!(count = self.registered.len(), "Unregistering commands");
        self.registered.clear();
    }
}
