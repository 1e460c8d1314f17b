use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use prepmedia_cli::{report_error, OutputFormat};
use prepmedia_core::{AppError, Config};
use prepmedia_infra::{init_telemetry, shutdown_telemetry};
use prepmedia_services::{resolve_key, AudioTranscriptionPipeline};

#[derive(Parser, Debug)]
#[command(name = "transcribe_audio")]
#[command(about = "Transcribe a learner recording stored behind the CDN")]
struct Args {
    /// Recording key or CDN URL, e.g. audio/user-recordings/abc123.webm
    #[arg(value_name = "KEY")]
    key: String,

    /// Attempts before giving up (default: TRANSCRIPTION_MAX_RETRIES)
    #[arg(long)]
    max_retries: Option<u32>,

    /// Only check that the key is an acceptable recording
    #[arg(long)]
    check_only: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = Config::from_env()?;
    init_telemetry(config.log_format(), config.environment())?;

    if args.check_only {
        let key = resolve_key(&args.key);
        return Ok(match config.transcription().audio_rules().check(&key) {
            Ok(()) => {
                println!("{} is a valid recording key", key);
                ExitCode::SUCCESS
            }
            Err(reason) => ExitCode::from(report_error(&AppError::InvalidInput(reason))),
        });
    }

    let pipeline = match AudioTranscriptionPipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(err) => return Ok(ExitCode::from(report_error(&AppError::from(err)))),
    };

    let max_retries = args
        .max_retries
        .unwrap_or(pipeline.config().max_retries);
    let outcome = pipeline
        .transcribe_audio_with_retry(&args.key, max_retries)
        .await;
    shutdown_telemetry();

    match outcome {
        Ok(result) => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => {
                    println!("\n=== Transcription ===\n");
                    if let Some(language) = &result.language {
                        println!("Language: {}", language);
                    }
                    if let Some(duration) = result.duration_seconds {
                        println!("Duration: {:.1} s", duration);
                    }
                    println!("\n{}", result.text);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let attempts = err.attempts();
            let app_error = AppError::from(err);
            eprintln!("transcription stopped after {} attempt(s)", attempts);
            Ok(ExitCode::from(report_error(&app_error)))
        }
    }
}
