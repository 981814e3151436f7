use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::thread;

use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};
use traytoast::Result;
use traytoast::config::{Config, DEFAULT_CONFIG_FILE};
use traytoast::telemetry::init_tracing;
use traytoast::types::Outcome;
use traytoast::{LifecycleReport, ToastRequest, Toaster};

use super::cli::Cli;

const WAITER_THREAD_NAME: &str = "traytoast-wait";

/// Issue d'une exécution de la CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Shown,
    Interrupted,
    NotShown,
}

pub async fn run(cli: Cli) -> Result<Completion> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::from_env_and_file(&config_path)?;
    let background = cli.background || config.toast.background;
    let request = build_request(&cli, &config);
    let toaster = Arc::new(Toaster::with_settings(config.tray));

    let waiter = if background {
        if !toaster.show_toast(request, true) {
            warn!("background toast did not start");
            return Ok(Completion::NotShown);
        }
        info!("toast running in the background");
        let toaster = Arc::clone(&toaster);
        off_runtime(move || toaster.join())
    } else {
        let toaster = Arc::clone(&toaster);
        off_runtime(move || Some(toaster.run(request)))
    };

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("interrupted, leaving the toast to the shell");
            Ok(Completion::Interrupted)
        }
        joined = waiter => Ok(finish(joined, cli.report)),
    }
}

/// Exécute `work` sur un thread détaché, jamais attendu à l'arrêt du runtime.
fn off_runtime<T, F>(work: F) -> oneshot::Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let spawned = thread::Builder::new()
        .name(WAITER_THREAD_NAME.to_string())
        .spawn(move || {
            let _ = tx.send(work());
        });
    if let Err(err) = spawned {
        warn!(error = %err, "waiter thread not spawned");
    }
    rx
}

fn build_request(cli: &Cli, config: &Config) -> ToastRequest {
    let mut request = config.toast.to_request();
    if let Some(title) = &cli.title {
        request.title.clone_from(title);
    }
    if let Some(message) = &cli.message {
        request.message.clone_from(message);
    }
    if let Some(icon) = &cli.icon {
        request = request.icon(icon.clone());
    }
    if cli.persist {
        request = request.persist();
    } else if let Some(duration) = cli.duration {
        request = request.duration(Some(duration));
    }
    if let Some(target) = cli.open.clone() {
        request = request.on_click(move || open_target(&target));
    }
    request
}

fn finish(
    joined: std::result::Result<Option<LifecycleReport>, oneshot::error::RecvError>,
    print: bool,
) -> Completion {
    let report = match joined {
        Ok(Some(report)) => report,
        Ok(None) => {
            warn!("no lifecycle report available");
            return Completion::NotShown;
        }
        Err(err) => {
            warn!(error = %err, "lifecycle task failed");
            return Completion::NotShown;
        }
    };

    if print {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!(error = %err, "report not serializable"),
        }
    }

    info!(
        class = %report.class_name,
        outcome = ?report.outcome,
        stage = %report.final_stage,
        "toast finished"
    );
    if report.outcome == Outcome::NotDisplayed {
        Completion::NotShown
    } else {
        Completion::Shown
    }
}

fn open_target(target: &str) {
    match opener(target).spawn() {
        Ok(_) => info!(%target, "opened click target"),
        Err(err) => warn!(%target, error = %err, "failed to open click target"),
    }
}

#[cfg(target_os = "windows")]
fn opener(target: &str) -> Command {
    let mut command = Command::new("explorer.exe");
    command.arg(target);
    command
}

#[cfg(target_os = "macos")]
fn opener(target: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(target);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener(target: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
