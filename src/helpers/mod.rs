use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::string;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelperError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),
	#[error("Serde error: {0}")]
	Serde(#[from] serde_json::Error),
	#[error("FromUtf8 error: {0}")]
	FromUtf8Error(#[from] string::FromUtf8Error),
	#[error("Other Error {0}")]
	FromString(String),
}

impl HelperError {
	pub fn msg<M: Into<String>>(msg: M) -> Self {
		HelperError::FromString(msg.into())
	}
}

/// Directory holding the running executable. Files that ship alongside the
/// binary (the prompt template, a `.env`) are looked up here.
pub fn program_dir() -> Result<PathBuf, HelperError> {
	let exe = env::current_exe()?;
	match exe.parent() {
		Some(dir) => Ok(dir.to_path_buf()),
		None => Err(HelperError::msg(format!("{} has no parent directory", exe.display()))),
	}
}

/// Reads lines until end-of-stream and joins them with `\n`.
///
/// Line terminators (`\n` or `\r\n`) are dropped, so the result never ends
/// with a newline and empty input yields an empty string.
pub fn collect_lines<R: BufRead>(reader: R) -> Result<String, HelperError> {
	let mut lines = Vec::new();
	for line in reader.lines() {
		lines.push(line?);
	}
	Ok(lines.join("\n"))
}

pub fn dump_to_file(file_path: impl AsRef<Path>, content: &str) -> Result<(), HelperError> {
	fs::write(file_path.as_ref(), content)?;
	tracing::debug!("wrote {} bytes to {}", content.len(), file_path.as_ref().display());
	Ok(())
}

pub fn pretty_json<T: serde::Serialize>(object: &T) -> Result<String, HelperError> {
	Ok(serde_json::to_string_pretty(object)?)
}
