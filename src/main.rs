use std::sync::Arc;

use clap::Parser;
use project_hub::cli::commands::Cli;
use project_hub::cli::{handlers, startup};
use project_hub::io::ConfigStore;
use project_hub::io::logging;
use project_hub::model::{Config, Level};
use project_hub::remote::{GhClient, ProjectClient, StubClient};
use project_hub::tui::{self, App};

fn main() {
    let mut cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init_tracing(&log_path) {
        eprintln!("warning: logging disabled ({}): {}", log_path.display(), e);
    }

    let config_path = match cli.config.clone().map_or_else(ConfigStore::default_path, Ok) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let store = ConfigStore::new(config_path);

    // A broken config file should not keep the board from opening
    let mut config_warning = None;
    let config = store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default config");
        config_warning = Some(format!("Config ignored: {}", e));
        Config::default()
    });

    let session = match startup::resolve_session(&cli, &config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(project = %session.project_id, owner = %session.owner, demo = cli.demo, "starting");

    let client: Arc<dyn ProjectClient> = if cli.demo {
        Arc::new(StubClient::new())
    } else {
        Arc::new(GhClient::new(&cli.gh_path))
    };

    match cli.command.take() {
        Some(cmd) => {
            if let Some(warning) = &config_warning {
                eprintln!("warning: {}", warning);
            }
            if let Err(e) = handlers::dispatch(cmd, &session, client.as_ref(), cli.json) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            let mut app = App::new(session, config);
            if let Some(warning) = config_warning {
                app.notify(Level::Warning, warning);
            }
            if let Err(e) = tui::run(app, client, store) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
