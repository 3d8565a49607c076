//! Pulsar command line tool.
//!
//! Provides the `pulsar` binary for inspecting and updating the persisted
//! settings and the registered Laravel projects, using the same `AppState`
//! wiring as the client.
//!
//! Exit codes: 0 = success, 1 = invalid input, 3 = storage failure.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use pulsar_core::{ProjectId, SettingsPatch, Theme};
use pulsar_state::{
    AppState, DiagnosticKind, DiagnosticSink, FanoutSink, MemorySink, ProjectError, StateConfig,
    TracingSink,
};

/// Pulsar settings and project registry.
#[derive(Parser)]
#[command(name = "pulsar", about = "Pulsar settings and project registry")]
struct Cli {
    /// Path to the database file (overrides PULSAR_DB_PATH).
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the persisted settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Manage registered projects.
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings as JSON.
    Show,
    /// Merge the given values into the settings and persist them.
    Set {
        /// Color theme: dark or light.
        #[arg(long)]
        theme: Option<Theme>,

        /// Path to the PHP executable.
        #[arg(long)]
        php_path: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// Print registered projects as JSON.
    List,
    /// Register a Laravel project directory.
    Add {
        #[arg(long)]
        name: String,

        /// Project root; must contain an `artisan` file.
        #[arg(long)]
        path: PathBuf,
    },
    /// Unregister a project.
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let mut config = match StateConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }

    // Settings failures are absorbed by the store; keep a copy to pick the
    // exit code.
    let failures = Arc::new(MemorySink::new());
    let sinks: Vec<Arc<dyn DiagnosticSink>> = vec![Arc::new(TracingSink), failures.clone()];
    let state = match AppState::with_diagnostics(&config, Arc::new(FanoutSink::new(sinks))) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", config.db_path, e);
            return 3;
        }
    };

    match cli.command {
        Commands::Settings { action } => run_settings(&state, &failures, action).await,
        Commands::Projects { action } => run_projects(&state, action).await,
    }
}

async fn run_settings(state: &AppState, failures: &MemorySink, action: SettingsAction) -> i32 {
    state.settings.load().await;
    if let Some(failure) = failures.take().into_iter().next() {
        eprintln!("Error: {}", failure.message);
        return 3;
    }

    match action {
        SettingsAction::Show => {}
        SettingsAction::Set { theme, php_path } => {
            let mut patch = SettingsPatch::new();
            if let Some(theme) = theme {
                patch = patch.with_theme(theme);
            }
            if let Some(php_path) = php_path {
                patch = patch.with_php_path(php_path);
            }
            if patch.is_empty() {
                eprintln!("Error: nothing to set; pass --theme or --php-path");
                return 1;
            }

            state.settings.save(patch).await;
            if failures.count(DiagnosticKind::SaveFailed) > 0 {
                for failure in failures.take() {
                    eprintln!("Error: {}", failure.message);
                }
                return 3;
            }
        }
    }

    print_json(&state.settings.get())
}

async fn run_projects(state: &AppState, action: ProjectsAction) -> i32 {
    let result = match action {
        ProjectsAction::List => state.projects.refresh().await.map(|projects| print_json(&projects)),
        ProjectsAction::Add { name, path } => state
            .projects
            .add(&name, &path)
            .await
            .map(|project| print_json(&project)),
        ProjectsAction::Remove { id } => state
            .projects
            .remove(&ProjectId::from(id.as_str()))
            .await
            .map(|()| 0),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                ProjectError::Persistence(_) => 3,
                _ => 1,
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_settings_set() {
        let cli = Cli::try_parse_from([
            "pulsar", "--db", "/tmp/p.db", "settings", "set", "--theme", "Light",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/p.db"));
        match cli.command {
            Commands::Settings {
                action: SettingsAction::Set { theme, php_path },
            } => {
                assert_eq!(theme, Some(Theme::Light));
                assert_eq!(php_path, None);
            }
            _ => panic!("expected settings set"),
        }
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["pulsar", "settings", "set", "--theme", "sepia"]).is_err());
    }

    #[tokio::test]
    async fn settings_set_round_trips_through_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db").to_string_lossy().into_owned();

        let set = Cli::try_parse_from([
            "pulsar", "--db", db.as_str(), "settings", "set", "--php-path", "/usr/bin/php",
        ])
        .unwrap();
        assert_eq!(run(set).await, 0);

        let config = StateConfig::default().with_db_path(db);
        let state = AppState::new(&config).unwrap();
        state.settings.load().await;
        assert_eq!(state.settings.get().php_path, "/usr/bin/php");
    }

    #[tokio::test]
    async fn empty_settings_set_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db").to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["pulsar", "--db", db.as_str(), "settings", "set"]).unwrap();
        assert_eq!(run(cli).await, 1);
    }
}
