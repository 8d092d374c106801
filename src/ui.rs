//! User-facing I/O seam.
//!
//! [`crate::app::App`] never prints directly: it hands finished [`View`]s,
//! messages and confirmation prompts to a [`Ui`]. The terminal implementation
//! renders to stdout; tests record what would have been shown.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::net::types::{FieldChange, HistoryRecord, Item, User};
use crate::render;
use crate::state::permissions::{Controls, PermissionPanel};

/// Full record behind a history row, alongside its field diff.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryDetail {
    pub history_id: i64,
    pub record: Option<HistoryRecord>,
    pub changes: Vec<FieldChange>,
}

/// Something worth redrawing.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    CurrentUser(Option<User>),
    Permissions(PermissionPanel),
    Items { items: Vec<Item>, controls: Controls },
    History { item_id: i64, records: Vec<HistoryRecord> },
    HistoryDetail(HistoryDetail),
}

pub trait Ui {
    /// Blocking one-line message (success or failure).
    fn alert(&mut self, message: &str);

    /// Ask a yes/no question; anything but an explicit yes is a no.
    fn confirm(&mut self, prompt: &str) -> bool;

    fn show(&mut self, view: View);

    /// Persist a downloaded file and return where it went.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be written.
    fn save_file(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Stdout/stdin implementation of [`Ui`].
pub struct TerminalUi {
    download_dir: PathBuf,
}

impl TerminalUi {
    #[must_use]
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self { download_dir: download_dir.into() }
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

impl Ui for TerminalUi {
    fn alert(&mut self, message: &str) {
        println!("» {message}");
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }

    fn show(&mut self, view: View) {
        println!("{}", render::render_view(&view));
    }

    fn save_file(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(filename);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn save_file_writes_into_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut ui = TerminalUi::new(dir.path().join("exports"));
        let path = ui.save_file("history_item_7.csv", b"ID\n1\n").unwrap();
        assert_eq!(path, dir.path().join("exports").join("history_item_7.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"ID\n1\n");
    }
}
