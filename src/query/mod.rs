use std::io::{self, Write};

use crate::gemini::TextGenerator;
use crate::prompt;

pub const FAILURE_MESSAGE: &str = "Failed to generate query.";

/// Sends template + list to the generator and returns the trimmed text.
///
/// Every remote failure is logged and becomes `None`; nothing escapes. A
/// response that is empty after trimming also counts as no result.
pub async fn generate_query<G: TextGenerator>(generator: &G, template: &str, input: &str) -> Option<String> {
	let full_prompt = prompt::compose(template, input);
	tracing::debug!("composed prompt of {} bytes", full_prompt.len());
	match generator.generate(&full_prompt).await {
		Ok(text) => {
			let query = text.trim();
			if query.is_empty() {
				tracing::warn!("model returned an empty response");
				None
			} else {
				Some(query.to_string())
			}
		},
		Err(err) => {
			tracing::error!("remote call failed: {}", err);
			eprintln!("Error processing list: {}", err);
			None
		},
	}
}

pub fn print_outcome<W: Write>(out: &mut W, query: Option<&str>) -> io::Result<()> {
	match query {
		Some(query) => writeln!(out, "{}", query),
		None => writeln!(out, "{}", FAILURE_MESSAGE),
	}
}
