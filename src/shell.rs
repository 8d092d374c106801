//! Line-oriented command shell.
//!
//! Each input line is split into words (single and double quotes group
//! words, backslash escapes one character) and parsed with clap into a
//! [`ShellCommand`], which is dispatched to the matching [`App`] handler.
//! Usage errors and `help` output are written back to the shell output;
//! they never reach the server.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};

use crate::app::App;
use crate::forms::ItemForm;
use crate::net::api::InventoryApi;
use crate::net::types::{HistoryAction, Role};
use crate::state::history::HistoryFilter;
use crate::ui::Ui;

pub const PROMPT: &str = "warehouse> ";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("unclosed quote")]
    UnclosedQuote,

    #[error("{0}")]
    Usage(#[from] clap::Error),
}

/// Whether the shell keeps reading after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Parser, Debug, PartialEq)]
#[command(name = "warehouse", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// Log in and load the item list
    Login {
        username: String,
        #[arg(long)]
        role: Role,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show what the current role may do
    Permissions,
    /// List all items
    Items,
    /// Create an item
    Add(ItemFields),
    /// Update the filled-in fields of an item
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Delete an item after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List an item's change history
    History {
        item_id: Option<i64>,
        #[arg(long)]
        changed_by: Option<String>,
        #[arg(long)]
        action: Option<HistoryAction>,
        /// RFC 3339 lower bound on the change time
        #[arg(long)]
        from: Option<String>,
        /// RFC 3339 upper bound on the change time
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one history record with its field diff
    Diff {
        history_id: i64,
        /// Item to re-list if the record is not in the last listing
        #[arg(long)]
        item: Option<i64>,
    },
    /// Save an item's history as CSV
    Export { item_id: Option<i64> },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Raw item form fields. Numbers stay strings until the form coerces them.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub quantity: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
}

impl ItemFields {
    #[must_use]
    pub fn into_form(self) -> ItemForm {
        ItemForm {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
        }
    }
}

/// Split a line into words, honouring quotes and backslash escapes.
///
/// # Errors
///
/// Returns [`ShellError::UnclosedQuote`] if a quote is left open.
pub fn split_words(line: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::UnclosedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns [`ShellError`] for unbalanced quotes, usage errors and help
/// requests (the help text is the error message).
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    let parsed = ShellLine::try_parse_from(words)?;
    Ok(Some(parsed.command))
}

/// Run one command against the controller.
pub async fn dispatch<A: InventoryApi, U: Ui>(app: &mut App<A, U>, command: ShellCommand) -> Flow {
    match command {
        ShellCommand::Login { username, role } => app.login(&username, role).await,
        ShellCommand::Logout => app.logout(),
        ShellCommand::Whoami => app.whoami(),
        ShellCommand::Permissions => app.show_permissions(),
        ShellCommand::Items => app.load_items().await,
        ShellCommand::Add(fields) => app.add_item(fields.into_form()).await,
        ShellCommand::Edit { id, fields } => app.update_item(id, fields.into_form()).await,
        ShellCommand::Delete { id, yes } => app.delete_item(id, yes).await,
        ShellCommand::History { item_id, changed_by, action, from, to, offset } => {
            let filter = HistoryFilter { changed_by, action, from, to, offset };
            app.load_history(item_id, filter).await;
        }
        ShellCommand::Diff { history_id, item } => app.show_history_details(history_id, item).await,
        ShellCommand::Export { item_id } => app.export_history(item_id).await,
        ShellCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Prompt, read and dispatch until `quit` or end of input.
///
/// `read_line` appends the next line to its buffer and returns the number of
/// bytes read, like [`io::Stdin::read_line`].
///
/// # Errors
///
/// Returns the first I/O error from reading input or writing output.
pub async fn run<A, U, R, W>(app: &mut App<A, U>, mut read_line: R, mut out: W) -> io::Result<()>
where
    A: InventoryApi,
    U: Ui,
    R: FnMut(&mut String) -> io::Result<usize>,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                tracing::debug!(?command, "dispatching");
                if dispatch(app, command).await == Flow::Quit {
                    return Ok(());
                }
            }
            Err(err) => writeln!(out, "{}", err.to_string().trim_end())?,
        }
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;
