use reqwest::header::CONTENT_TYPE;
use serde_derive::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use url::Url;

use crate::config::Settings;
use crate::helpers::{self, HelperError};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum GeminiError {
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),
	#[error("API returned {status}: {message}")]
	Status { status: u16, message: String },
	#[error("could not decode response: {0}")]
	Json(#[from] serde_json::Error),
	#[error("invalid endpoint URL: {0}")]
	Url(#[from] url::ParseError),
	#[error("prompt was blocked: {0}")]
	Blocked(String),
	#[error("no candidates in the response")]
	NoCandidates,
	#[error("no text in the first candidate")]
	NoText,
	#[error("could not write request/response dump: {0}")]
	Dump(#[from] HelperError),
}

/// Anything that turns a text prompt into generated text, or fails.
pub trait TextGenerator {
	fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GeminiError>> + Send;
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Part {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Content {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
	#[serde(default)]
	pub parts: Vec<Part>,
}

impl Content {
	pub fn user_text(text: &str) -> Self {
		Content { role: Some("user".to_string()), parts: vec![Part { text: Some(text.to_string()) }] }
	}

	/// All text parts concatenated, or `None` when there are none.
	pub fn text(&self) -> Option<String> {
		let texts: Vec<&str> = self.parts.iter().filter_map(|p| p.text.as_deref()).collect();
		if texts.is_empty() {
			None
		} else {
			Some(texts.concat())
		}
	}
}

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
	pub contents: Vec<Content>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
	pub content: Option<Content>,
	pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
	pub block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
	#[serde(default)]
	pub candidates: Vec<Candidate>,
	pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
	error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
	message: String,
}

pub struct GeminiClient {
	api_key: String,
	model: String,
	post_url: Url,
	http: reqwest::Client,
	pub write_req_resp: bool,
}

impl std::fmt::Debug for GeminiClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeminiClient")
			.field("model", &self.model)
			.field("post_url", &self.post_url)
			.field("api_key", &"[REDACTED]")
			.finish()
	}
}

impl GeminiClient {
	pub fn new(api_base: &Url, api_key: String, model: String) -> Result<Self, GeminiError> {
		let post_url = Self::endpoint(api_base, &model)?;
		Ok(GeminiClient {
			api_key,
			model,
			post_url,
			http: reqwest::Client::new(),
			write_req_resp: false,
		})
	}

	pub fn from_settings(settings: &Settings) -> Result<Self, GeminiError> {
		let mut client = Self::new(&settings.api_base, settings.api_key.clone(), settings.model.clone())?;
		client.write_req_resp = settings.write_req_resp;
		Ok(client)
	}

	/// `{base}/models/{model}:generateContent`
	pub fn endpoint(api_base: &Url, model: &str) -> Result<Url, url::ParseError> {
		let base = api_base.as_str().trim_end_matches('/');
		Url::parse(&format!("{}/models/{}:generateContent", base, model))
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn post_url(&self) -> &Url {
		&self.post_url
	}

	pub async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
		let request = GenerateContentRequest { contents: vec![Content::user_text(prompt)] };
		let serialised = helpers::pretty_json(&request)?;
		if self.write_req_resp {
			helpers::dump_to_file("last_request.json", &serialised)?;
		}
		tracing::debug!("POST {} ({} bytes)", self.post_url(), serialised.len());
		let resp = self.http
			.post(self.post_url.clone())
			.header(API_KEY_HEADER, &self.api_key)
			.header(CONTENT_TYPE, "application/json")
			.body(serialised)
			.send()
			.await?;
		let status = resp.status();
		let body = resp.text().await?;
		if self.write_req_resp {
			helpers::dump_to_file("last_response.json", &body)?;
		}
		if !status.is_success() {
			return Err(GeminiError::Status { status: status.as_u16(), message: Self::error_message(&body) });
		}
		Self::parse_response(&body)
	}

	/// Extracts the generated text from a `generateContent` response body.
	pub fn parse_response(response: &str) -> Result<String, GeminiError> {
		let parsed: GenerateContentResponse = serde_json::from_str(response)?;
		let candidate = match parsed.candidates.first() {
			Some(candidate) => candidate,
			None => {
				return match parsed.prompt_feedback.and_then(|f| f.block_reason) {
					Some(reason) => Err(GeminiError::Blocked(reason)),
					None => Err(GeminiError::NoCandidates),
				};
			},
		};
		if let Some(reason) = candidate.finish_reason.as_deref() {
			tracing::debug!("finish reason: {}", reason);
		}
		candidate.content.as_ref().and_then(Content::text).ok_or(GeminiError::NoText)
	}

	fn error_message(body: &str) -> String {
		match serde_json::from_str::<ApiErrorBody>(body) {
			Ok(parsed) => parsed.error.message,
			Err(_) => body.trim().to_string(),
		}
	}
}

impl TextGenerator for GeminiClient {
	async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
		self.generate_content(prompt).await
	}
}
