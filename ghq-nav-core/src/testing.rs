//! Test doubles for command execution and the host

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::host::{Host, InputBoxOptions, PickEvent, ProgressOptions, QuickPick};
use crate::shell::{CommandLine, CommandRunner};
use crate::{Error, Result};

enum Scripted {
    Stdout(String),
    Failure(String),
}

/// Runner answering from a table keyed by the rendered command line
///
/// Commands missing from the table fail as if the program did not exist.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Option<PathBuf>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, stdout: &str) -> Self {
        self.responses
            .insert(command.to_string(), Scripted::Stdout(stdout.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, stderr: &str) -> Self {
        self.responses
            .insert(command.to_string(), Scripted::Failure(stderr.to_string()));
        self
    }

    /// Every command run so far with its working directory
    pub fn calls(&self) -> Vec<(String, Option<PathBuf>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &CommandLine, cwd: Option<&Path>) -> Result<String> {
        let rendered = command.to_string();
        self.calls
            .lock()
            .unwrap()
            .push((rendered.clone(), cwd.map(Path::to_path_buf)));

        match self.responses.get(&rendered) {
            Some(Scripted::Stdout(stdout)) => Ok(stdout.clone()),
            Some(Scripted::Failure(stderr)) => Err(Error::Command {
                command: rendered,
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
            None => Err(Error::Spawn {
                program: command.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Side effects a [`RecordingHost`] observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    OpenFolder(PathBuf, bool),
    OpenExternal(String),
    OpenDocument(PathBuf),
    UpdateWorkspaceFolders(usize, PathBuf),
    Warning(String),
    Information(String),
    ShowProgress(String),
    HideProgress,
}

#[derive(Default)]
struct HostState {
    picks: VecDeque<PickEvent>,
    inputs: VecDeque<Option<String>>,
    active_file: Option<PathBuf>,
    workspace: Vec<PathBuf>,
    actions: Vec<HostAction>,
    shown: Vec<QuickPick>,
    updates: Vec<QuickPick>,
    prompts: Vec<InputBoxOptions>,
}

/// Host replaying scripted user answers and recording everything else
///
/// Once the scripted picks or inputs run out, picks are dismissed and
/// input boxes cancelled.
#[derive(Default)]
pub struct RecordingHost {
    state: Mutex<HostState>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_picks(self, picks: impl IntoIterator<Item = PickEvent>) -> Self {
        self.state.lock().unwrap().picks.extend(picks);
        self
    }

    pub fn with_inputs(self, inputs: impl IntoIterator<Item = Option<String>>) -> Self {
        self.state.lock().unwrap().inputs.extend(inputs);
        self
    }

    pub fn with_active_file(self, path: impl Into<PathBuf>) -> Self {
        self.state.lock().unwrap().active_file = Some(path.into());
        self
    }

    pub fn with_workspace_folders(self, folders: impl IntoIterator<Item = PathBuf>) -> Self {
        self.state.lock().unwrap().workspace.extend(folders);
        self
    }

    pub fn actions(&self) -> Vec<HostAction> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn shown_picks(&self) -> Vec<QuickPick> {
        self.state.lock().unwrap().shown.clone()
    }

    pub fn updated_picks(&self) -> Vec<QuickPick> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn input_prompts(&self) -> Vec<InputBoxOptions> {
        self.state.lock().unwrap().prompts.clone()
    }

    pub fn workspace(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().workspace.clone()
    }

    fn record(&self, action: HostAction) {
        self.state.lock().unwrap().actions.push(action);
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn show_quick_pick(&self, pick: &QuickPick) -> PickEvent {
        let mut state = self.state.lock().unwrap();
        state.shown.push(pick.clone());
        state.picks.pop_front().unwrap_or(PickEvent::Hide)
    }

    async fn update_quick_pick(&self, pick: &QuickPick) {
        self.state.lock().unwrap().updates.push(pick.clone());
    }

    async fn show_input_box(&self, options: &InputBoxOptions) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        state.prompts.push(options.clone());
        state.inputs.pop_front().flatten()
    }

    async fn show_warning_message(&self, message: &str) {
        self.record(HostAction::Warning(message.to_string()));
    }

    async fn show_information_message(&self, message: &str) {
        self.record(HostAction::Information(message.to_string()));
    }

    async fn show_progress(&self, options: &ProgressOptions) {
        self.record(HostAction::ShowProgress(options.message.clone()));
    }

    async fn hide_progress(&self) {
        self.record(HostAction::HideProgress);
    }

    async fn open_folder(&self, path: &Path, new_window: bool) -> Result<()> {
        self.record(HostAction::OpenFolder(path.to_path_buf(), new_window));
        Ok(())
    }

    async fn open_external(&self, url: &str) -> Result<()> {
        self.record(HostAction::OpenExternal(url.to_string()));
        Ok(())
    }

    async fn open_document(&self, path: &Path) -> Result<()> {
        self.record(HostAction::OpenDocument(path.to_path_buf()));
        Ok(())
    }

    async fn workspace_folders(&self) -> Result<Vec<PathBuf>> {
        Ok(self.workspace())
    }

    async fn update_workspace_folders(&self, position: usize, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.workspace.insert(position, path.to_path_buf());
        state
            .actions
            .push(HostAction::UpdateWorkspaceFolders(position, path.to_path_buf()));
        Ok(())
    }

    async fn active_file_path(&self) -> Option<PathBuf> {
        self.state.lock().unwrap().active_file.clone()
    }
}
