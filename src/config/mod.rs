use std::env;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::helpers;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("GEMINI_API_KEY is not set (export it or put it in a .env file)")]
	MissingApiKey,
	#[error("invalid API base URL {url}: {source}")]
	InvalidBaseUrl { url: String, source: url::ParseError },
}

pub struct Settings {
	pub api_key: String,
	pub model: String,
	pub api_base: Url,
	pub write_req_resp: bool,
}

impl std::fmt::Debug for Settings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Settings")
			.field("api_key", &"[REDACTED]")
			.field("model", &self.model)
			.field("api_base", &self.api_base)
			.field("write_req_resp", &self.write_req_resp)
			.finish()
	}
}

impl Settings {
	/// Builds settings from explicit overrides, falling back to the environment
	/// and then to the built-in defaults.
	pub fn resolve(model: Option<String>, api_base: Option<String>, write_req_resp: bool) -> Result<Self, ConfigError> {
		Self::resolve_with(|name| env::var(name).ok(), model, api_base, write_req_resp)
	}

	pub fn resolve_with<F>(lookup: F, model: Option<String>, api_base: Option<String>, write_req_resp: bool) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

		let api_key = non_empty(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
		let model = model
			.or_else(|| non_empty(MODEL_VAR))
			.unwrap_or_else(|| DEFAULT_MODEL.to_string());
		let base = api_base
			.or_else(|| non_empty(API_BASE_VAR))
			.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
		let api_base = Url::parse(&base).map_err(|source| ConfigError::InvalidBaseUrl { url: base.clone(), source })?;

		Ok(Settings { api_key, model, api_base, write_req_resp })
	}
}

/// Loads `.env` from the program directory, then from the working directory
/// (and its parents). Variables already present in the environment win.
pub fn load_dotenv() {
	if let Ok(dir) = helpers::program_dir() {
		load_dotenv_file(&dir.join(".env"));
	}
	match dotenvy::dotenv() {
		Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
		Err(err) if err.not_found() => {},
		Err(err) => tracing::warn!("ignoring .env: {}", err),
	}
}

fn load_dotenv_file(path: &Path) {
	match dotenvy::from_path(path) {
		Ok(()) => tracing::debug!("loaded environment from {}", path.display()),
		Err(err) if err.not_found() => {},
		Err(err) => tracing::warn!("ignoring {}: {}", path.display(), err),
	}
}
