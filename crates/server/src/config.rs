#![forbid(unsafe_code)]

use crate::auth::BasicAuth;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "todo_server")]
#[command(version, about = "Task list service over SQLite", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding `tasks.sqlite` and crash reports.
    #[arg(long, global = true, env = "TODO_STORAGE_DIR", default_value = ".tareas")]
    pub(crate) storage_dir: PathBuf,

    #[arg(long, global = true, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub(crate) host: String,

    #[arg(long, global = true, env = "TODO_PORT", default_value_t = 5000)]
    pub(crate) port: u16,

    /// Enables HTTP Basic auth together with `--auth-password`.
    #[arg(long, global = true, env = "TODO_AUTH_USER")]
    pub(crate) auth_user: Option<String>,

    #[arg(long, global = true, env = "TODO_AUTH_PASSWORD", hide_env_values = true)]
    pub(crate) auth_password: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Serve the JSON API and browser UI (default).
    Serve,
    /// Import tasks from a JSON array of records.
    Seed {
        file: PathBuf,
    },
    /// Print task statistics as JSON.
    Stats,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("--auth-user and --auth-password must be given together")]
    PartialAuth,
}

#[derive(Clone, Debug)]
pub(crate) struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) auth: Option<BasicAuth>,
}

impl Cli {
    pub(crate) fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    pub(crate) fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        let user = self.auth_user.as_deref().filter(|v| !v.is_empty());
        let password = self.auth_password.as_deref().filter(|v| !v.is_empty());
        let auth = match (user, password) {
            (Some(user), Some(password)) => Some(BasicAuth::new(user, password)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialAuth),
        };
        Ok(ServerConfig {
            host: self.host.clone(),
            port: self.port,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_on_localhost() {
        let cli = Cli::try_parse_from(["todo_server", "--storage-dir", "/tmp/x"]).expect("parse");
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.storage_dir, PathBuf::from("/tmp/x"));
        let config = cli.server_config().expect("config");
        assert_eq!(config.port, cli.port);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "todo_server",
            "seed",
            "tareas.json",
            "--storage-dir",
            "/tmp/y",
            "--port",
            "8080",
        ])
        .expect("parse");
        assert_eq!(
            cli.command(),
            Command::Seed {
                file: PathBuf::from("tareas.json")
            }
        );
        assert_eq!(cli.storage_dir, PathBuf::from("/tmp/y"));
        assert_eq!(cli.port, 8080);
    }

    #[test]
    fn auth_needs_both_halves() {
        let cli = Cli::try_parse_from(["todo_server", "--auth-user", "ana", "--auth-password", "x"])
            .expect("parse");
        assert!(cli.server_config().expect("config").auth.is_some());

        let cli = Cli::try_parse_from(["todo_server", "--auth-user", "ana", "--auth-password", ""])
            .expect("parse");
        assert_eq!(cli.server_config().unwrap_err(), ConfigError::PartialAuth);
    }
}
