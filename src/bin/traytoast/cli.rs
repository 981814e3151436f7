use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Affiche une notification dans la zone de notification", long_about = None)]
pub struct Cli {
    /// Titre de la notification.
    #[arg(long)]
    pub title: Option<String>,

    /// Texte de la notification.
    #[arg(long)]
    pub message: Option<String>,

    /// Fichier d'icône (`.ico`, ou toute image avec la fonctionnalité `convert`).
    #[arg(long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Durée d'affichage (ex. "10s").
    #[arg(long, value_parser = parse_duration, conflicts_with = "persist")]
    pub duration: Option<Duration>,

    /// Garde la notification jusqu'au clic ou à la fermeture.
    #[arg(long, action = ArgAction::SetTrue)]
    pub persist: bool,

    /// Affiche la notification en arrière-plan et attend sa fin ou Ctrl-C.
    #[arg(long, action = ArgAction::SetTrue)]
    pub background: bool,

    /// URL ou fichier ouvert par le gestionnaire du bureau lors d'un clic.
    #[arg(long, value_name = "TARGET")]
    pub open: Option<String>,

    /// Affiche le rapport de cycle de vie en JSON une fois la notification fermée.
    #[arg(long, action = ArgAction::SetTrue)]
    pub report: bool,

    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "traytoast=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
