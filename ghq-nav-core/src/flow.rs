//! Interactive repository and file selection
//!
//! Single-stage flows pick a repository and perform one action on it. The
//! file flow walks one quick-pick through two steps: repository, then a
//! file inside it.

use std::path::{Component, Path, PathBuf};

use crate::config::Tools;
use crate::host::{Host, InputBoxOptions, PickEvent, ProgressOptions, QuickPick, QuickPickItem};
use crate::locator::{FileEntry, Repository, RepositoryLocator};
use crate::package::PackageResolver;
use crate::shell::CommandRunner;
use crate::Result;

const REPOSITORY_PLACEHOLDER: &str = "Select a Repository";
const FILE_PLACEHOLDER: &str = "Select a File";
const URL_INPUT_TITLE: &str = "Repository Url";
const PROGRESS_TITLE: &str = "GHQ";

/// Browser URL for a checkout laid out as `<root>/<host>/<owner>/<repo>`
pub fn web_url(repository_path: &Path) -> String {
    let segments: Vec<_> = repository_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    let start = segments.len().saturating_sub(3);

    format!("https://{}", segments[start..].join("/"))
}

/// Where the two-step file pick currently is
enum FileFlowStep {
    SelectingRepository(Vec<Repository>),
    SelectingFile(Vec<FileEntry>),
}

/// Drives the selection flows against a [`Host`]
#[derive(Debug)]
pub struct SelectionFlow<R, H> {
    locator: RepositoryLocator<R>,
    resolver: PackageResolver<R>,
    host: H,
}

impl<R: CommandRunner + Clone, H: Host> SelectionFlow<R, H> {
    /// Create a flow controller sharing `runner` between ghq and package queries
    pub fn new(runner: R, tools: Tools, host: H) -> Self {
        Self {
            locator: RepositoryLocator::new(runner.clone(), tools.clone()),
            resolver: PackageResolver::new(runner, tools),
            host,
        }
    }
}

impl<R: CommandRunner, H: Host> SelectionFlow<R, H> {
    /// The host this flow talks to
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The repository locator used by this flow
    pub fn locator(&self) -> &RepositoryLocator<R> {
        &self.locator
    }

    /// The package resolver used by this flow
    pub fn resolver(&self) -> &PackageResolver<R> {
        &self.resolver
    }

    /// Ask the user for a repository and return its absolute path
    ///
    /// `None` when the pick is dismissed, accepted empty, or the ghq root
    /// cannot be determined.
    pub async fn select_repository(&self) -> Result<Option<PathBuf>> {
        let repositories = self.locator.list_repositories().await?;
        let pick = QuickPick::new(
            REPOSITORY_PLACEHOLDER,
            repositories.iter().map(QuickPickItem::from).collect(),
        );

        let repository = match self.host.show_quick_pick(&pick).await {
            PickEvent::Accept(Some(index)) => match repositories.get(index) {
                Some(repository) => repository,
                None => return Ok(None),
            },
            PickEvent::Accept(None) | PickEvent::Hide => return Ok(None),
        };

        Ok(self.locator.repository_path(&repository.label).await)
    }

    /// Open the chosen repository as a folder
    pub async fn open(&self, new_window: bool) -> Result<()> {
        let Some(path) = self.select_repository().await? else {
            return Ok(());
        };

        tracing::info!(path = %path.display(), new_window, "Opening repository");
        self.host.open_folder(&path, new_window).await
    }

    /// Open the chosen repository's web page
    pub async fn open_in_browser(&self) -> Result<()> {
        let Some(path) = self.select_repository().await? else {
            return Ok(());
        };

        let url = web_url(&path);
        tracing::info!(url = %url, "Opening repository in browser");
        self.host.open_external(&url).await
    }

    /// Append the chosen repository to the workspace folders
    pub async fn add_to_workspace(&self) -> Result<()> {
        let Some(path) = self.select_repository().await? else {
            return Ok(());
        };

        let position = self.host.workspace_folders().await?.len();
        tracing::info!(path = %path.display(), position, "Adding repository to workspace");
        self.host.update_workspace_folders(position, &path).await
    }

    /// Pick a repository, then one of its files, and open the file
    ///
    /// Accepting with nothing selected keeps the pick open; dismissing it
    /// at either step ends the flow.
    pub async fn open_file_in_current_window(&self) -> Result<()> {
        let mut pick = QuickPick {
            placeholder: REPOSITORY_PLACEHOLDER.to_string(),
            step: Some(1),
            total_steps: Some(2),
            busy: true,
            ..QuickPick::default()
        };
        self.host.update_quick_pick(&pick).await;

        let repositories = self.locator.list_repositories().await?;
        pick.items = repositories.iter().map(QuickPickItem::from).collect();
        pick.busy = false;

        let mut step = FileFlowStep::SelectingRepository(repositories);

        loop {
            let index = match self.host.show_quick_pick(&pick).await {
                PickEvent::Hide => return Ok(()),
                PickEvent::Accept(None) => continue,
                PickEvent::Accept(Some(index)) => index,
            };

            match &step {
                FileFlowStep::SelectingRepository(repositories) => {
                    let Some(label) = repositories.get(index).map(|r| r.label.clone()) else {
                        continue;
                    };

                    pick.busy = true;
                    pick.value.clear();
                    pick.step = Some(2);
                    pick.placeholder = FILE_PLACEHOLDER.to_string();
                    self.host.update_quick_pick(&pick).await;

                    let files = self.locator.list_files(&label).await?;
                    pick.items = files.iter().map(QuickPickItem::from).collect();
                    pick.match_on_description = true;
                    pick.busy = false;

                    step = FileFlowStep::SelectingFile(files);
                }
                FileFlowStep::SelectingFile(files) => {
                    let Some(file) = files.get(index) else {
                        continue;
                    };

                    tracing::info!(path = %file.path.display(), "Opening file");
                    return self.host.open_document(&file.path).await;
                }
            }
        }
    }

    /// Prompt for a repository URL and clone it with `ghq get`
    ///
    /// The prompt is pre-filled with the upstream repository of the package
    /// owning the active file, when there is one. A failing `ghq get` is
    /// returned as an error.
    pub async fn get_repository_by_url(&self) -> Result<()> {
        let value = match self.host.active_file_path().await {
            Some(path) => self
                .resolver
                .resolve_repository_url(&path)
                .await
                .unwrap_or_default(),
            None => String::new(),
        };

        let options = InputBoxOptions {
            title: URL_INPUT_TITLE.to_string(),
            value,
        };
        let Some(input) = self.host.show_input_box(&options).await else {
            return Ok(());
        };
        let url = input.trim();
        if url.is_empty() {
            return Ok(());
        }

        self.host
            .show_progress(&ProgressOptions {
                title: PROGRESS_TITLE.to_string(),
                message: format!("get {}", url),
                cancellable: false,
            })
            .await;
        let result = self.locator.get_repository(url).await;
        self.host.hide_progress().await;

        let output = result?;
        self.host.show_information_message(&output).await;

        Ok(())
    }
}
