#![deny(clippy::all, clippy::pedantic)]

use std::{
    fs,
    io::{self as stdio, BufRead, Write},
    path::{Path, PathBuf},
};

use blog_admin::{application::error::AppError, infra::error::InfraError};

fn read_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|err| {
        InfraError::Io(stdio::Error::new(
            err.kind(),
            format!("failed to read {}: {err}", path.display()),
        ))
        .into()
    })
}

/// Inline value or the contents of a file, whichever was given.
pub fn read_opt_value(val: Option<String>, file: Option<PathBuf>) -> Result<Option<String>, AppError> {
    match file {
        Some(path) => read_file(&path).map(Some),
        None => Ok(val),
    }
}

/// Password file contents without the trailing newline editors leave behind.
pub fn read_secret_file(path: &Path) -> Result<String, AppError> {
    Ok(read_file(path)?.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask for one line on stderr and read it from stdin.
pub fn prompt_line(label: &str) -> Result<String, AppError> {
    let mut stderr = stdio::stderr();
    write!(stderr, "{label}: ").map_err(InfraError::Io)?;
    stderr.flush().map_err(InfraError::Io)?;
    let mut line = String::new();
    stdio::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(InfraError::Io)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
