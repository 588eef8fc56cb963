//! Scene document checker: `scene-check <path>`.
//!
//! Prints `OK: <path>` and exits 0 for a well-formed document; otherwise
//! reports each problem on stderr and exits 2.

use std::process::ExitCode;

use blockcad_lib::validation::DocumentValidator;

fn check(path: &str) -> Result<(), Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| vec![format!("cannot read {path}: {e}")])?;
    let doc: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| vec![format!("invalid JSON in {path}: {e}")])?;
    let errors = DocumentValidator::new(&doc).validate_all();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockcad=info".into()),
        )
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: scene-check <path>");
        return ExitCode::from(2);
    };

    match check(&path) {
        Ok(()) => {
            println!("OK: {path}");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            tracing::debug!(count = errors.len(), "scene check failed");
            for e in &errors {
                eprintln!("{path}: {e}");
            }
            ExitCode::from(2)
        }
    }
}
