//! Palisade daemon: line-oriented JSON gateway over stdin/stdout.
//!
//! Reads one JSON request per line from stdin and writes one JSON
//! response per line to stdout. Responses are either the executor's
//! result envelope or `{"isSuccess": false, "error": {...}}` for
//! requests that never reached the executor. Logs go to stderr,
//! filtered by `RUST_LOG` (default `info`).
//!
//! Usage: `palisaded [DATA_DIR]`. Defaults to the current directory.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use palisade::{error_response, GatewayError, Service};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from(".")
    };

    let service = match Service::open(&data_dir) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("failed to open gateway at '{}': {}", data_dir.display(), e);
            process::exit(1);
        }
    };
    info!("palisaded ready at {}, reading requests from stdin", data_dir.display());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(raw) => respond(&service, &raw),
            Err(err) => error_response(&GatewayError::MalformedRequest {
                reason: err.to_string(),
            }),
        };

        if writeln!(stdout, "{}", response).is_err() {
            break;
        }
        let _ = stdout.flush();
    }

    service.shutdown();
    info!("palisaded stopped");
}

fn respond(service: &Service, raw: &serde_json::Value) -> serde_json::Value {
    match service.handle(raw) {
        Ok(result) => serde_json::to_value(result).expect("result envelope serializes to JSON"),
        Err(err) => error_response(&err),
    }
}
