// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Make sure `path` may be written.
///
/// An existing file is replaced only with `force` or after the user answers
/// `y` at the prompt. Without a terminal on stdin there is nobody to ask, so
/// the existing file is kept.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }

    warning(format!("'{}' already exists.", path.display()));

    let refused = || AppError::Export(format!("'{}' not overwritten", path.display()));

    if !io::stdin().is_terminal() {
        return Err(refused());
    }

    print!("Overwrite? [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => {
            info("Existing file will be overwritten.");
            Ok(())
        }
        _ => Err(refused()),
    }
}
