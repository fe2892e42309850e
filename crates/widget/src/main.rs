//! Pi-hole Status Widget - Main Entry Point

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use widget::cli::{CacheCommand, Cli, Command, PasswordCommand, TriggerAction};
use widget::menu::{self, MenuAction};
use widget::render::{FormFactor, RenderConfig};
use widget::server::{run_server, AppState};
use widget::settings::Settings;
use widget::{
    build_orchestrator, init_logging, open_store, prompt_missing_password, run_once, watch,
};

// Refresh cycles never run concurrently; one thread is enough
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let settings = Settings::load(cli.config.as_deref())?;
    let render = RenderConfig {
        locale: cli.locale.unwrap_or(settings.locale),
        refresh_hours: settings.refresh_hours,
    };
    let orchestrator = build_orchestrator(&settings, open_store(&settings))?;
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let family = cli.family.unwrap_or(if interactive {
        FormFactor::Large
    } else {
        FormFactor::Medium
    });

    info!("=== Pi-hole Widget v{} ===", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Command::Password {
            command: PasswordCommand::Set,
        }) => {
            if interactive {
                eprint!("New admin password: ");
            }
            let password = menu::read_password(&mut io::stdin().lock())?;
            orchestrator.vault().store_credential(&password)?;
        }
        Some(Command::Password {
            command: PasswordCommand::Reset,
        }) => {
            orchestrator.vault().reset()?;
        }
        Some(Command::Cache {
            command: CacheCommand::Clear,
        }) => {
            orchestrator.cache().clear();
        }
        Some(Command::Refresh) => {
            run_once(&orchestrator, family, &render, cli.json, interactive).await?;
        }
        Some(Command::Watch { interval_secs }) => {
            let interval = interval_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| settings.refresh_interval());
            watch(&orchestrator, interval, family, &render, cli.json).await?;
        }
        Some(Command::Serve { listen }) => {
            let handle = PrometheusBuilder::new().install_recorder()?;
            let addr = listen.unwrap_or_else(|| settings.listen_addr.clone());
            let state = Arc::new(AppState::new(orchestrator, render, Some(handle)));
            run_server(&addr, state).await?;
        }
        None => {
            // Tapping the widget passes `--action refresh` and skips the menu
            if interactive && cli.action != Some(TriggerAction::Refresh) {
                let action = menu::prompt(&mut io::stdin().lock(), &mut io::stderr())?;
                match action {
                    MenuAction::ChangePassword => {
                        orchestrator.vault().reset()?;
                    }
                    MenuAction::ClearCache => orchestrator.cache().clear(),
                    MenuAction::Refresh | MenuAction::Cancel => {}
                }
            }
            if interactive {
                prompt_missing_password(&orchestrator, &mut io::stdin().lock(), &mut io::stderr());
            }
            run_once(&orchestrator, family, &render, cli.json, interactive).await?;
        }
    }

    Ok(())
}
