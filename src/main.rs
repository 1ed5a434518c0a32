use clap::Parser;
use env_logger::Env;
use log::error;

use image_authenticity::{
    AnalysisConfig, check_authenticity,
    error::AuthenticityError,
    report::{ErrorReport, IndicatorReport, to_json},
};

/// Heuristic authenticity check for a single still image.
#[derive(Parser, Debug)]
#[command(name = "image-authenticity", version)]
struct Cli {
    /// Path to a file holding the encoded image, or the encoding itself
    /// (a `data:image/...;base64,` URL or bare base64)
    input: Option<String>,

    /// Emit the verdict grouped per hypothesis, with EXIF indicators
    #[arg(long)]
    indicators: bool,

    /// Run the extractors one after another on the calling thread
    #[arg(long)]
    sequential: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let output = match cli.input.as_deref() {
        None => to_json(
            &ErrorReport::new(AuthenticityError::InputMissing.to_string()),
            cli.pretty,
        ),
        Some(input) => {
            let config = AnalysisConfig {
                parallel: !cli.sequential,
                ..AnalysisConfig::default()
            };
            let outcome = check_authenticity(input, config);

            if cli.indicators {
                to_json(
                    &IndicatorReport::new(&outcome.result, outcome.metadata),
                    cli.pretty,
                )
            } else {
                to_json(&outcome.result, cli.pretty)
            }
        }
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize result: {}", e),
    }
}
