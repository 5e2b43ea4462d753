//! Release notes synthesis from git history.

mod formatter;
mod stable_sort;

pub use formatter::{CommitLogFormatter, NotesContext, escape_markup, format_commit_lines};
pub use stable_sort::stable_sort_by_key;
