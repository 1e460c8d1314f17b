use clap::ValueEnum;
use prepmedia_core::{AppError, ErrorMetadata};

/// Output format shared by the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Process exit status for an error, following the sysexits convention.
pub fn exit_code_for(err: &AppError) -> u8 {
    match err {
        AppError::Configuration(_) => 78,
        AppError::InvalidInput(_) | AppError::UnsupportedMedia(_) => 65,
        AppError::NotFound(_) => 66,
        _ if err.is_recoverable() => 75,
        _ => 1,
    }
}

/// Print an error for an operator and return the exit status to use.
pub fn report_error(err: &AppError) -> u8 {
    eprintln!("error[{}]: {}", err.error_code(), err);
    if let Some(action) = err.suggested_action() {
        eprintln!("  hint: {}", action);
    }
    exit_code_for(err)
}
