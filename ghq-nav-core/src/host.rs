//! Host capabilities consumed by the selection flows
//!
//! The host owns every user-facing surface: selection lists, input boxes,
//! notifications, and the editor itself. Flows only describe what to show
//! and react to what the user picked.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::locator::{FileEntry, Repository};
use crate::Result;

/// One entry of a quick-pick list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPickItem {
    /// Primary text
    pub label: String,
    /// Secondary text, shown dimmed next to the label
    pub description: Option<String>,
}

impl QuickPickItem {
    /// Item with a label only
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }
}

impl From<&Repository> for QuickPickItem {
    fn from(repository: &Repository) -> Self {
        Self::new(&repository.label)
    }
}

impl From<&FileEntry> for QuickPickItem {
    fn from(file: &FileEntry) -> Self {
        Self {
            label: file.label.clone(),
            description: Some(file.description.clone()),
        }
    }
}

/// State of a searchable single-choice list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickPick {
    /// Hint shown while nothing is typed
    pub placeholder: String,
    /// Entries to choose from
    pub items: Vec<QuickPickItem>,
    /// Current filter text
    pub value: String,
    /// Current step of a multi-step pick
    pub step: Option<u8>,
    /// Number of steps of a multi-step pick
    pub total_steps: Option<u8>,
    /// Whether the list is loading and input should be disabled
    pub busy: bool,
    /// Whether the filter also matches item descriptions
    pub match_on_description: bool,
}

impl QuickPick {
    /// Pick with a placeholder and items
    pub fn new(placeholder: impl Into<String>, items: Vec<QuickPickItem>) -> Self {
        Self {
            placeholder: placeholder.into(),
            items,
            ..Self::default()
        }
    }

    /// Indices of the items matching `filter`, in list order
    ///
    /// Matching is a case-insensitive substring test against the label,
    /// and against the description when `match_on_description` is set.
    pub fn matching(&self, filter: &str) -> Vec<usize> {
        let needle = filter.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.label.to_lowercase().contains(&needle)
                    || (self.match_on_description
                        && item
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle)))
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// What the user did with a quick-pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickEvent {
    /// Accepted, with the index of the selected item if any
    Accept(Option<usize>),
    /// Dismissed
    Hide,
}

/// Options for a free-text prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBoxOptions {
    /// Prompt title
    pub title: String,
    /// Pre-filled text
    pub value: String,
}

/// Options for a progress notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOptions {
    /// Notification title
    pub title: String,
    /// Current progress message
    pub message: String,
    /// Whether the user may cancel; flows never set this
    pub cancellable: bool,
}

/// UI and editor surface provided by the embedding environment
#[async_trait]
pub trait Host: Send + Sync {
    /// Show a quick-pick and wait for the user to accept or dismiss it
    async fn show_quick_pick(&self, pick: &QuickPick) -> PickEvent;

    /// Push updated pick state (busy flag, step, items) to a visible pick
    async fn update_quick_pick(&self, _pick: &QuickPick) {}

    /// Ask for free text; `None` when dismissed
    async fn show_input_box(&self, options: &InputBoxOptions) -> Option<String>;

    /// Show a warning notification
    async fn show_warning_message(&self, message: &str);

    /// Show an informational notification
    async fn show_information_message(&self, message: &str);

    /// Show a progress notification until [`Host::hide_progress`]
    async fn show_progress(&self, options: &ProgressOptions);

    /// Remove the progress notification
    async fn hide_progress(&self);

    /// Open a folder, in a new window or replacing the current one
    async fn open_folder(&self, path: &Path, new_window: bool) -> Result<()>;

    /// Open a URL outside the editor
    async fn open_external(&self, url: &str) -> Result<()>;

    /// Open a file in the current window
    async fn open_document(&self, path: &Path) -> Result<()>;

    /// Current workspace folders, in order
    async fn workspace_folders(&self) -> Result<Vec<PathBuf>>;

    /// Insert a workspace folder at `position`, keeping existing folders
    async fn update_workspace_folders(&self, position: usize, path: &Path) -> Result<()>;

    /// File currently being edited, if any
    async fn active_file_path(&self) -> Option<PathBuf>;
}

#[async_trait]
impl<H: Host + ?Sized> Host for Arc<H> {
    async fn show_quick_pick(&self, pick: &QuickPick) -> PickEvent {
        (**self).show_quick_pick(pick).await
    }

    async fn update_quick_pick(&self, pick: &QuickPick) {
        (**self).update_quick_pick(pick).await
    }

    async fn show_input_box(&self, options: &InputBoxOptions) -> Option<String> {
        (**self).show_input_box(options).await
    }

    async fn show_warning_message(&self, message: &str) {
        (**self).show_warning_message(message).await
    }

    async fn show_information_message(&self, message: &str) {
        (**self).show_information_message(message).await
    }

    async fn show_progress(&self, options: &ProgressOptions) {
        (**self).show_progress(options).await
    }

    async fn hide_progress(&self) {
        (**self).hide_progress().await
    }

    async fn open_folder(&self, path: &Path, new_window: bool) -> Result<()> {
        (**self).open_folder(path, new_window).await
    }

    async fn open_external(&self, url: &str) -> Result<()> {
        (**self).open_external(url).await
    }

    async fn open_document(&self, path: &Path) -> Result<()> {
        (**self).open_document(path).await
    }

    async fn workspace_folders(&self) -> Result<Vec<PathBuf>> {
        (**self).workspace_folders().await
    }

    async fn update_workspace_folders(&self, position: usize, path: &Path) -> Result<()> {
        (**self).update_workspace_folders(position, path).await
    }

    async fn active_file_path(&self) -> Option<PathBuf> {
        (**self).active_file_path().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files_pick() -> QuickPick {
        QuickPick::new(
            "Select a File",
            vec![
                QuickPickItem {
                    label: "lib.rs".to_string(),
                    description: Some("src/lib.rs".to_string()),
                },
                QuickPickItem {
                    label: "README.md".to_string(),
                    description: Some("README.md".to_string()),
                },
            ],
        )
    }

    #[test]
    fn test_matching_label_only() {
        let pick = files_pick();
        assert_eq!(pick.matching("readme"), vec![1]);
        assert!(pick.matching("src").is_empty());
        assert_eq!(pick.matching(""), vec![0, 1]);
    }

    #[test]
    fn test_matching_description() {
        let mut pick = files_pick();
        pick.match_on_description = true;
        assert_eq!(pick.matching("src/"), vec![0]);
    }

    #[test]
    fn test_items_from_model() {
        let item = QuickPickItem::from(&Repository::new("github.com/owner/repo"));
        assert_eq!(item.label, "github.com/owner/repo");
        assert!(item.description.is_none());

        let file = FileEntry {
            label: "lib.rs".to_string(),
            description: "src/lib.rs".to_string(),
            path: PathBuf::from("/root/a/b/src/lib.rs"),
        };
        let item = QuickPickItem::from(&file);
        assert_eq!(item.description.as_deref(), Some("src/lib.rs"));
    }
}
