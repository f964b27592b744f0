#![forbid(unsafe_code)]

mod api;
mod auth;
mod config;
mod http;
mod seed;
mod server;
mod support;

use clap::Parser;
use config::{Cli, Command};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use support::{init_tracing, install_crash_reporter, now_ms_i64, write_last_crash};
use todo_storage::SqliteStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    install_crash_reporter(cli.storage_dir.clone());

    let result = run(&cli);
    if let Err(err) = result.as_ref() {
        tracing::error!(error = %err, "todo_server failed");
        write_last_crash(&cli.storage_dir, "error", &err.to_string());
    }
    result
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command() {
        Command::Serve => {
            let config = cli.server_config()?;
            let store = SqliteStore::open(&cli.storage_dir)?;
            let listener = server::bind(&config)?;
            let mut api = api::Api::new(store, config.auth);
            server::run_server(listener, &mut api, Arc::new(AtomicBool::new(false)))?;
        }
        Command::Seed { file } => {
            let mut store = SqliteStore::open(&cli.storage_dir)?;
            let report = seed::seed_from_file(&mut store, &file, now_ms_i64())?;
            println!(
                "{}",
                serde_json::json!({
                    "categorias": report.categories,
                    "creadas": report.created,
                    "omitidas": report.skipped,
                })
            );
        }
        Command::Stats => {
            let store = SqliteStore::open(&cli.storage_dir)?;
            let stats = store.task_stats(now_ms_i64())?;
            println!("{}", serde_json::to_string_pretty(&api::stats_json(&stats))?);
        }
    }
    Ok(())
}
