//! Pi-hole Status Widget
//!
//! Wires settings, the file-backed secret store and the API client into a
//! refresh orchestrator, and renders outcomes for the terminal, as JSON or
//! over HTTP.

pub mod cli;
pub mod menu;
pub mod render;
pub mod server;
pub mod settings;

use acquisition::{RefreshOrchestrator, RefreshOutcome};
use chrono::Utc;
use pihole_api::ApiClient;
use render::{render_text, FormFactor, RenderConfig, WidgetView};
use sample_store::{CredentialVault, FileSecretStore, SampleStore, SecretStore};
use settings::Settings;
use status_evaluator::StatusEvaluator;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Orchestrator as used by the binary
pub type WidgetOrchestrator = RefreshOrchestrator<ApiClient, Arc<dyn SecretStore>>;

/// Secret store under the configured state directory
pub fn open_store(settings: &Settings) -> Arc<dyn SecretStore> {
    Arc::new(FileSecretStore::new(&settings.state_dir))
}

/// Build the orchestrator from settings
pub fn build_orchestrator(
    settings: &Settings,
    store: Arc<dyn SecretStore>,
) -> anyhow::Result<WidgetOrchestrator> {
    settings.validate()?;
    settings.evaluator.validate()?;
    let api = ApiClient::new(settings.api_config())?;
    let vault = CredentialVault::new(Arc::clone(&store), settings.password_key.clone());
    let cache = SampleStore::new(store, settings.cache_key.clone());
    Ok(RefreshOrchestrator::new(
        api,
        vault,
        cache,
        StatusEvaluator::new(settings.evaluator.clone()),
    ))
}

/// Initialize logging on stderr
pub fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.expect("Failed to set tracing subscriber");
}

/// Write one outcome to `out`
pub fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &RefreshOutcome,
    family: FormFactor,
    render: &RenderConfig,
    json: bool,
) -> anyhow::Result<()> {
    let now = Utc::now();
    if json {
        let view = WidgetView::new(outcome, render, now);
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_text(outcome, family, render, now))?;
    }
    out.flush()?;
    Ok(())
}

/// Ask for the admin password when none is stored yet
pub fn ensure_password<R: BufRead, W: Write>(
    orchestrator: &WidgetOrchestrator,
    input: &mut R,
    prompt: &mut W,
) -> anyhow::Result<()> {
    if orchestrator.vault().is_configured() {
        return Ok(());
    }
    write!(prompt, "Pi-hole admin password (stored locally): ")?;
    prompt.flush()?;
    let password = menu::read_password(input)?;
    orchestrator.vault().store_credential(&password)?;
    Ok(())
}

/// First-run password prompt of interactive runs
///
/// A blank or cancelled answer is reported on `prompt` and the cycle still
/// runs; it then falls back without a credential like any other failure.
pub fn prompt_missing_password<R: BufRead, W: Write>(
    orchestrator: &WidgetOrchestrator,
    input: &mut R,
    prompt: &mut W,
) -> bool {
    match ensure_password(orchestrator, input, prompt) {
        Ok(()) => true,
        Err(e) => {
            warn!("No password stored: {}", e);
            let _ = writeln!(prompt, "\nPassword not saved: {}", e);
            false
        }
    }
}

/// One refresh cycle, rendered to stdout
///
/// Interactive runs get a notice on stderr when the fetch failed.
pub async fn run_once(
    orchestrator: &WidgetOrchestrator,
    family: FormFactor,
    render: &RenderConfig,
    json: bool,
    interactive: bool,
) -> anyhow::Result<RefreshOutcome> {
    let outcome = orchestrator.refresh().await;

    if interactive {
        if let Some(cause) = &outcome.failure {
            eprintln!("Pi-hole not reachable, showing the last known values.\n\nError: {}\n", cause);
        }
    }

    write_outcome(&mut io::stdout().lock(), &outcome, family, render, json)?;
    Ok(outcome)
}

/// Refresh every `interval` until Ctrl-C
///
/// A cycle always runs to completion before the next one is scheduled.
pub async fn watch(
    orchestrator: &WidgetOrchestrator,
    interval: Duration,
    family: FormFactor,
    render: &RenderConfig,
    json: bool,
) -> anyhow::Result<()> {
    info!("Refreshing every {:?}", interval);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_once(orchestrator, family, render, json, false).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}
