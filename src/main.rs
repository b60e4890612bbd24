use anyhow::Context;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use requirements_intake::console::Console;
use requirements_intake::driver::SessionError;
use requirements_intake::extractor::ExtractionError;
use requirements_intake::intake::IntakeError;
use requirements_intake::model::Provider;
use requirements_intake::output::OutputFormat;
use requirements_intake::{config, intake, model, output};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "requirements-intake",
    about = "Interview a user about a project and turn the conversation into structured requirements"
)]
struct Args {
    /// Model provider (openai or anthropic)
    #[structopt(short, long, default_value = "openai")]
    provider: Provider,

    /// Model identifier, overriding the provider default
    #[structopt(short, long)]
    model: Option<String>,

    /// Path to a settings TOML file
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of tokens per model reply
    #[structopt(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[structopt(long)]
    temperature: Option<f32>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Send a single prompt and print the reply
    Ask {
        /// The prompt text
        #[structopt(required = true)]
        prompt: Vec<String>,
    },

    /// Run a requirements intake interview
    Intake {
        /// Give up after this many model turns (unbounded by default)
        #[structopt(long)]
        max_turns: Option<usize>,

        /// File to write the requirements to (stdout if omitted)
        #[structopt(short, long)]
        output: Option<PathBuf>,

        /// Output format (json or toml)
        #[structopt(short, long, default_value = "json")]
        format: OutputFormat,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the conversation and the final record
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let environment = envy::from_env::<config::Environment>()?;
    let args = Args::from_args();

    let settings_file = config::SettingsFile::load(args.config.as_deref()).await?;
    let max_turns = match &args.command {
        Command::Intake { max_turns, .. } => *max_turns,
        Command::Ask { .. } => None,
    };
    let settings = config::resolve(
        args.provider,
        settings_file,
        config::Overrides {
            model: args.model,
            max_tokens: args.max_tokens,
            temperature: args.temperature,
            max_turns,
        },
    );

    let model = model::connect(
        args.provider,
        environment.api_key(args.provider)?,
        settings.model,
    )
    .context("Failed to create HTTP client")?;

    match args.command {
        Command::Ask { prompt } => {
            let reply = intake::ask(model.as_ref(), &prompt.join(" "))
                .await
                .context("Model request failed")?;
            println!("{reply}");
        }
        Command::Intake {
            output: destination,
            format,
            ..
        } => {
            let mut human = Console::stdio();
            let outcome = intake::run_intake(model.as_ref(), &mut human, settings.max_turns).await;
            let record = match outcome {
                Ok(record) => record,
                Err(IntakeError::Extraction(ExtractionError::Schema(violation))) => {
                    eprintln!(
                        "\nThe requirements could not be finalized ({violation}). Please run the intake again."
                    );
                    anyhow::bail!("extraction failed");
                }
                Err(IntakeError::Session(SessionError::InputClosed)) => {
                    eprintln!("\nInput ended before the interview was finished.");
                    anyhow::bail!("intake aborted");
                }
                Err(error) => return Err(error.into()),
            };

            output::write(&record, format, destination.as_deref()).await?;
            if let Some(path) = destination {
                println!("\nRequirements written to {}.", path.display());
            }
        }
    }

    Ok(())
}
