//! Terminal host: line-based prompts plus an external editor
//!
//! Quick-picks are printed as numbered lists. Typing text narrows the list,
//! a number picks the matching entry, an empty line accepts the first
//! entry, and `:q` or end of input dismisses the pick.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ghq_nav_core::{
    CommandLine, CommandRunner, EditorConfig, Error, Host, InputBoxOptions, PickEvent,
    ProgressOptions, QuickPick, Result,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::workspace_file::WorkspaceFile;

/// Entries listed before the rest is folded into a count
const MAX_VISIBLE: usize = 20;

const DISMISS: &str = ":q";

type Input = Box<dyn AsyncBufRead + Unpin + Send>;
type Output = Box<dyn Write + Send>;
type Launcher = Box<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

/// What a line typed at a quick-pick prompt means
#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Accept(Option<usize>),
    Filter(String),
    Dismiss,
}

fn parse_answer(line: &str, matches: &[usize]) -> Answer {
    let line = line.trim();

    if line == DISMISS {
        return Answer::Dismiss;
    }
    if line.is_empty() {
        return Answer::Accept(matches.first().copied());
    }

    match line.parse::<usize>() {
        Ok(n) if (1..=matches.len().min(MAX_VISIBLE)).contains(&n) => {
            Answer::Accept(Some(matches[n - 1]))
        }
        _ => Answer::Filter(line.to_string()),
    }
}

fn heading(pick: &QuickPick) -> String {
    match (pick.step, pick.total_steps) {
        (Some(step), Some(total)) => format!("[{}/{}] {}", step, total, pick.placeholder),
        _ => pick.placeholder.clone(),
    }
}

/// [`Host`] that talks to the user over stdin/stderr
pub struct TerminalHost<R> {
    runner: R,
    editor: EditorConfig,
    active_file: Option<PathBuf>,
    input: tokio::sync::Mutex<Input>,
    output: Mutex<Output>,
    session_folders: Mutex<Vec<PathBuf>>,
    launcher: Launcher,
}

impl<R: CommandRunner> TerminalHost<R> {
    /// Host reading from stdin and prompting on stderr
    pub fn new(runner: R, editor: EditorConfig) -> Self {
        Self::with_io(
            runner,
            editor,
            Box::new(BufReader::new(tokio::io::stdin())),
            Box::new(std::io::stderr()),
        )
    }

    /// Host with explicit prompt streams
    pub fn with_io(runner: R, editor: EditorConfig, input: Input, output: Output) -> Self {
        Self {
            runner,
            editor,
            active_file: None,
            input: tokio::sync::Mutex::new(input),
            output: Mutex::new(output),
            session_folders: Mutex::new(Vec::new()),
            // Detached so the browser never holds up the runtime
            launcher: Box::new(|url: &str| open::that_detached(url)),
        }
    }

    /// Treat `path` as the file currently being edited
    pub fn with_active_file(mut self, path: Option<PathBuf>) -> Self {
        self.active_file = path;
        self
    }

    fn write(&self, text: &str) {
        if let Ok(mut out) = self.output.lock() {
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }

    async fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        Ok((read > 0).then_some(line))
    }

    fn render(&self, pick: &QuickPick, filter: &str, matches: &[usize]) {
        let mut text = format!("\n{}\n", heading(pick));
        if !filter.is_empty() {
            text.push_str(&format!("  filter: {}\n", filter));
        }
        if matches.is_empty() {
            text.push_str("  (no matches)\n");
        }

        for (n, &index) in matches.iter().take(MAX_VISIBLE).enumerate() {
            let item = &pick.items[index];
            match &item.description {
                Some(description) if description != &item.label => {
                    text.push_str(&format!("{:>4}  {}  {}\n", n + 1, item.label, description));
                }
                _ => text.push_str(&format!("{:>4}  {}\n", n + 1, item.label)),
            }
        }
        if matches.len() > MAX_VISIBLE {
            text.push_str(&format!(
                "      ... {} more, type to filter\n",
                matches.len() - MAX_VISIBLE
            ));
        }

        text.push_str("> ");
        self.write(&text);
    }

    async fn run_editor(&self, flag: &str, path: &Path) -> Result<()> {
        let command = CommandLine::new(&self.editor.command)
            .arg(flag)
            .arg(path.to_string_lossy());
        self.runner.run(&command, None).await.map(|_| ())
    }
}

#[async_trait]
impl<R: CommandRunner> Host for TerminalHost<R> {
    async fn show_quick_pick(&self, pick: &QuickPick) -> PickEvent {
        let mut filter = pick.value.clone();

        loop {
            let matches = pick.matching(&filter);
            self.render(pick, &filter, &matches);

            let line = match self.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return PickEvent::Hide,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read answer");
                    return PickEvent::Hide;
                }
            };

            match parse_answer(&line, &matches) {
                Answer::Accept(index) => return PickEvent::Accept(index),
                Answer::Dismiss => return PickEvent::Hide,
                Answer::Filter(text) => filter = text,
            }
        }
    }

    async fn update_quick_pick(&self, pick: &QuickPick) {
        if pick.busy {
            self.write(&format!("{} (loading...)\n", heading(pick)));
        }
    }

    async fn show_input_box(&self, options: &InputBoxOptions) -> Option<String> {
        let prompt = if options.value.is_empty() {
            format!("{}: ", options.title)
        } else {
            format!("{} [{}]: ", options.title, options.value)
        };
        self.write(&prompt);

        let line = self.read_line().await.ok().flatten()?;
        let line = line.trim();

        if line == DISMISS {
            None
        } else if line.is_empty() {
            Some(options.value.clone())
        } else {
            Some(line.to_string())
        }
    }

    async fn show_warning_message(&self, message: &str) {
        self.write(&format!("warning: {}\n", message));
    }

    async fn show_information_message(&self, message: &str) {
        println!("{}", message);
    }

    async fn show_progress(&self, options: &ProgressOptions) {
        self.write(&format!("{}: {}...\n", options.title, options.message));
    }

    async fn hide_progress(&self) {}

    async fn open_folder(&self, path: &Path, new_window: bool) -> Result<()> {
        let flag = if new_window {
            &self.editor.new_window_flag
        } else {
            &self.editor.reuse_window_flag
        };
        self.run_editor(flag, path).await
    }

    async fn open_external(&self, url: &str) -> Result<()> {
        (self.launcher)(url)
            .map_err(|e| Error::Host(format!("Failed to open {}: {}", url, e)))
    }

    async fn open_document(&self, path: &Path) -> Result<()> {
        self.run_editor(&self.editor.reuse_window_flag, path).await
    }

    async fn workspace_folders(&self) -> Result<Vec<PathBuf>> {
        if let Some(file) = &self.editor.workspace_file {
            let base = file.parent().unwrap_or_else(|| Path::new("."));
            return Ok(WorkspaceFile::load(file)?.folder_paths(base));
        }

        self.session_folders
            .lock()
            .map(|folders| folders.clone())
            .map_err(|_| Error::Host("workspace folder list poisoned".to_string()))
    }

    async fn update_workspace_folders(&self, position: usize, path: &Path) -> Result<()> {
        if let Some(file) = &self.editor.workspace_file {
            let mut workspace = WorkspaceFile::load(file)?;
            workspace.insert(position, path);
            workspace.save(file)?;
            tracing::info!(file = %file.display(), position, "Workspace file updated");
            return Ok(());
        }

        self.run_editor(&self.editor.add_flag, path).await?;
        if let Ok(mut folders) = self.session_folders.lock() {
            let position = position.min(folders.len());
            folders.insert(position, path.to_path_buf());
        }
        Ok(())
    }

    async fn active_file_path(&self) -> Option<PathBuf> {
        self.active_file.clone()
    }
}
