//! Volatile session state shared by the editor, the output panel, and the
//! command handlers.
//!
//! [`SessionState`] is a plain bundle of independent [`Cell`]s. It performs no
//! I/O and enforces nothing beyond types: keeping `current_project` inside
//! `projects`, or `is_running` in step with the execution request, is up to
//! whoever writes those cells.

use crate::cell::Cell;
use crate::model::{Layout, LogStatus, OutputTab, Project, Snippet};

/// Code shown in the editor on start. Never run automatically.
pub const DEFAULT_CODE: &str = "// Query your models
$users = User::all();

// Or run any Laravel code
dump($users->count());
";

/// All session cells. Cloning shares the same cells.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Projects known to the host, as of the last sync.
    pub projects: Cell<Vec<Project>>,
    /// The open project, if any.
    pub current_project: Cell<Option<Project>>,
    /// Editor buffer.
    pub code: Cell<String>,
    /// Last execution result or error text.
    pub output: Cell<String>,
    /// True while an execution request is outstanding.
    pub is_running: Cell<bool>,
    pub layout: Cell<Layout>,
    pub output_tab: Cell<OutputTab>,
    pub snippets: Cell<Vec<Snippet>>,
    /// Accumulated log text. Kept as last written across status changes.
    pub logs: Cell<String>,
    pub log_status: Cell<LogStatus>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            projects: Cell::new(Vec::new()),
            current_project: Cell::new(None),
            code: Cell::new(DEFAULT_CODE.to_string()),
            output: Cell::new(String::new()),
            is_running: Cell::new(false),
            layout: Cell::new(Layout::Horizontal),
            output_tab: Cell::new(OutputTab::Tinker),
            snippets: Cell::new(Vec::new()),
            logs: Cell::new(String::new()),
            log_status: Cell::new(LogStatus::Idle),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_example_code_and_idle_logs() {
        let session = SessionState::new();
        assert_eq!(session.code.get(), DEFAULT_CODE);
        assert!(!session.code.get().is_empty());
        assert!(session.projects.get().is_empty());
        assert_eq!(session.current_project.get(), None);
        assert_eq!(session.output.get(), "");
        assert!(!session.is_running.get());
        assert_eq!(session.layout.get(), Layout::Horizontal);
        assert_eq!(session.output_tab.get(), OutputTab::Tinker);
        assert_eq!(session.log_status.get(), LogStatus::Idle);
    }

    #[test]
    fn clones_share_cells() {
        let session = SessionState::new();
        let handle = session.clone();
        handle.output.set("3".into());
        assert_eq!(session.output.get(), "3");
    }

    #[test]
    fn cells_are_independent() {
        let session = SessionState::new();
        session.output_tab.set(OutputTab::Logs);
        session.is_running.set(true);
        assert_eq!(session.log_status.get(), LogStatus::Idle);
        assert_eq!(session.output_tab.get(), OutputTab::Logs);
    }
}
