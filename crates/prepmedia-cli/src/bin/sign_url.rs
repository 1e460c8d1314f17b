use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::process::ExitCode;

use prepmedia_cli::{report_error, truncate_string, OutputFormat};
use prepmedia_core::{AppError, Config, ErrorMetadata, MediaCategory, SecureUrlOptions};
use prepmedia_infra::init_telemetry;
use prepmedia_services::SecureUrlService;

#[derive(Parser, Debug)]
#[command(name = "sign_url")]
#[command(about = "Issue signed CDN URLs for media objects")]
struct Args {
    /// Object keys or storage/CDN URLs to sign
    #[arg(required = true, value_name = "KEY")]
    keys: Vec<String>,

    /// Media category: image, video or audio
    #[arg(long, default_value = "image")]
    category: MediaCategory,

    /// Lifetime of the URLs (default: SIGNED_URL_EXPIRATION_HOURS)
    #[arg(long, value_name = "HOURS")]
    expiration_hours: Option<u32>,

    /// Print the input unchanged when it cannot be signed instead of failing
    #[arg(long)]
    best_effort: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(serde::Serialize)]
struct SignedRow {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    signed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = Config::from_env()?;
    init_telemetry(config.log_format(), config.environment())?;

    let service = SecureUrlService::from_config(&config);
    let options = SecureUrlOptions {
        expiration_hours: args.expiration_hours,
    };

    if args.best_effort {
        let urls = service
            .secure_urls_or_original(args.category, args.keys, options)
            .await;
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&urls)?),
            OutputFormat::Table => urls.iter().for_each(|url| println!("{}", url)),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let results = service
        .generate_secure_urls(args.category, args.keys.iter().cloned(), options)
        .await;

    let mut first_error: Option<AppError> = None;
    let rows: Vec<SignedRow> = args
        .keys
        .into_iter()
        .zip(results)
        .map(|(input, result)| match result {
            Ok(signed) => SignedRow {
                input,
                signed_url: Some(signed.signed_url),
                expires_at: Some(signed.expires_at),
                error_code: None,
                error: None,
            },
            Err(err) => {
                let app_error = AppError::from(err);
                let row = SignedRow {
                    input,
                    signed_url: None,
                    expires_at: None,
                    error_code: Some(app_error.error_code()),
                    error: Some(app_error.to_string()),
                };
                first_error.get_or_insert(app_error);
                row
            }
        })
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => print_rows_table(&rows),
    }

    Ok(match first_error {
        Some(err) => ExitCode::from(report_error(&err)),
        None => ExitCode::SUCCESS,
    })
}

fn print_rows_table(rows: &[SignedRow]) {
    println!("\n=== Signed URLs ===\n");

    for row in rows {
        match (&row.signed_url, &row.expires_at) {
            (Some(url), Some(expires_at)) => {
                println!("{:<40} expires {}", truncate_string(&row.input, 40), expires_at);
                println!("  {}", url);
            }
            _ => println!(
                "{:<40} FAILED [{}] {}",
                truncate_string(&row.input, 40),
                row.error_code.unwrap_or("UNKNOWN"),
                row.error.as_deref().unwrap_or_default()
            ),
        }
    }
}
