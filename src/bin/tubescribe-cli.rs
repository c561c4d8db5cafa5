use anyhow::{Context, Result};
use clap::Parser;

use tubescribe::TubeScribe;
use tubescribe::cli::FetchArgs;
use tubescribe::output_type::OutputType;
use tubescribe::response::map_error;
use tubescribe::tubescribe::DEFAULT_LANGUAGE;

#[derive(Parser, Debug)]
#[command(name = "tubescribe")]
#[command(about = "Print the transcript of a YouTube video")]
struct Params {
    /// YouTube video ID (e.g. dQw4w9WgXcQ) or full URL.
    video: String,

    /// Preferred language code. Falls back to any available track.
    #[arg(short = 'l', long = "language", default_value = DEFAULT_LANGUAGE)]
    language: String,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Json
    )]
    output_type: OutputType,

    #[command(flatten)]
    fetch: FetchArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tubescribe::init_logging();
    let params = Params::parse();

    let tubescribe = TubeScribe::new(&params.fetch.to_opts())?;
    let doc = match tubescribe.transcript(&params.video, &params.language).await {
        Ok(doc) => doc,
        Err(err) => {
            let mapped = map_error(&err);
            eprintln!("error ({}): {}", mapped.status, mapped.detail);
            std::process::exit(1);
        }
    };

    match params.output_type {
        OutputType::Json => {
            let json = serde_json::to_string_pretty(&doc).context("failed to encode transcript")?;
            println!("{json}");
        }
        OutputType::Text => println!("{}", doc.transcript_text),
    }

    Ok(())
}
