mod config;
mod db;
mod error;
mod grade;
mod ipc;
mod models;
mod schema;
mod store;

use std::io::{self, BufRead, Write};

use dotenv::dotenv;

fn main() {
    dotenv().ok();
    // stdout carries responses only; env_logger writes to stderr.
    env_logger::init();

    let config = match config::Config::from_env() {
        Ok(v) => v,
        Err(e) => {
            log::error!("invalid configuration: {e:#}");
            std::process::exit(2);
        }
    };
    let startup_workspace = config.workspace.clone();
    let mut state = ipc::AppState::new(config);
    if let Some(path) = startup_workspace {
        if let Err(e) = state.open_workspace(path) {
            log::error!("could not open start-up workspace: {e:#}");
        }
    }
    log::info!("schoold {} ready.", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                log::warn!("dropping malformed request: {e}");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{resp}");
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
