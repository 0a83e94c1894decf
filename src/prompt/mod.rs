use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::helpers;

pub const TEMPLATE_FILE_NAME: &str = "prompt.txt";

#[derive(Debug, Error)]
pub enum PromptError {
	#[error("prompt template not found: {}", path.display())]
	NotFound { path: PathBuf },
	#[error("could not read prompt template {}: {source}", path.display())]
	Read { path: PathBuf, source: io::Error },
	#[error("could not locate the program directory: {0}")]
	ProgramDir(#[from] helpers::HelperError),
}

/// The template next to the executable, unless an explicit path is given.
pub fn template_path(explicit: Option<&Path>) -> Result<PathBuf, PromptError> {
	match explicit {
		Some(path) => Ok(path.to_path_buf()),
		None => Ok(helpers::program_dir()?.join(TEMPLATE_FILE_NAME)),
	}
}

pub fn load_template(path: &Path) -> Result<String, PromptError> {
	match fs::read_to_string(path) {
		Ok(template) => {
			tracing::debug!("loaded prompt template {} ({} bytes)", path.display(), template.len());
			Ok(template)
		},
		Err(err) if err.kind() == io::ErrorKind::NotFound => {
			Err(PromptError::NotFound { path: path.to_path_buf() })
		},
		Err(err) => Err(PromptError::Read { path: path.to_path_buf(), source: err }),
	}
}

/// Template and list joined by exactly one newline. Neither side is trimmed.
pub fn compose(template: &str, input: &str) -> String {
	let mut full = String::with_capacity(template.len() + 1 + input.len());
	full.push_str(template);
	full.push('\n');
	full.push_str(input);
	full
}
