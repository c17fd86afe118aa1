//! Plan export: text file, clipboard summary and print

mod clipboard;
mod print;
mod text;

use std::path::PathBuf;

use thiserror::Error;

pub use clipboard::{clipboard_summary, copy_to_clipboard, osc52_sequence};
pub use print::{PrintOutcome, print_plan};
pub use text::{export_file_name, export_text, write_text_export};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to clipboard: {0}")]
    Clipboard(#[source] std::io::Error),

    #[error("Failed to run print command '{command}': {source}")]
    Print {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Print command '{command}' exited with {code:?}: {stderr}")]
    PrintCommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}
