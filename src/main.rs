use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

mod config;
mod gemini;
mod helpers;
mod logger;
mod prompt;
mod query;


use gemini::TextGenerator;

/// Turns an unformatted "top 100" list read from stdin into a Supabase query.
#[derive(Parser)]
#[command(name = "top100query")]
struct Cli {
	#[clap(long)]
	/// prompt template (default: prompt.txt next to the executable)
	prompt: Option<PathBuf>,
	#[clap(long)]
	/// model name (default: $GEMINI_MODEL or gemini-2.0-flash)
	model: Option<String>,
	#[clap(long)]
	/// API base URL (default: $GEMINI_API_BASE or the public Gemini endpoint)
	api_base: Option<String>,
	#[clap(long, default_value = "false")]
	/// write last_request.json and last_response.json to the working directory
	write_req_resp: bool,
	#[clap(short, long)]
	/// do not print the interactive banner lines
	quiet: bool,
	#[clap(short, long)]
	verbose: bool,
}

const EOF_KEY: &str = if cfg!(windows) { "Ctrl+Z" } else { "Ctrl+D" };

/// Loads the template, collects the list, asks the generator and prints the
/// outcome. Only a template problem or an I/O failure on the local streams
/// is an error; the remote call can only end in a printed failure message.
async fn run<G, R, W>(generator: &G, template_path: &Path, input: R, out: &mut W, quiet: bool) -> Result<(), Box<dyn std::error::Error>>
where
	G: TextGenerator,
	R: BufRead,
	W: Write,
{
	let template = prompt::load_template(template_path)?;

	if !quiet {
		eprintln!("Please enter your unformatted top 100 list (press {} when finished):", EOF_KEY);
	}
	let input_text = helpers::collect_lines(input)?;
	tracing::debug!("read {} lines of input", input_text.lines().count());

	if !quiet {
		eprintln!("\nProcessing list...");
	}
	let query = query::generate_query(generator, &template, &input_text).await;

	if query.is_some() && !quiet {
		eprintln!("\nGenerated Supabase Query:");
	}
	query::print_outcome(out, query.as_deref())?;
	out.flush()?;
	Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Cli::parse();
	logger::init(args.verbose);
	config::load_dotenv();

	let settings = match config::Settings::resolve(args.model, args.api_base, args.write_req_resp) {
		Ok(settings) => settings,
		Err(e) => {
			tracing::error!("configuration failed: {}", e);
			return Err(e.into());
		},
	};
	tracing::debug!("settings: {:?}", settings);

	let template_path = prompt::template_path(args.prompt.as_deref())?;
	let client = gemini::GeminiClient::from_settings(&settings)?;
	tracing::info!("using model {}", client.model());

	let stdin = io::stdin();
	let mut stdout = io::stdout();
	if let Err(e) = run(&client, &template_path, stdin.lock(), &mut stdout, args.quiet).await {
		tracing::error!("{}", e);
		return Err(e);
	}
	Ok(())
}
