#[path = "traytoast/app.rs"]
mod app;
#[path = "traytoast/cli.rs"]
mod cli;

use std::error::Error as StdError;
use std::process::ExitCode;

use app::Completion;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(cli).await {
        Ok(Completion::Shown | Completion::Interrupted) => ExitCode::SUCCESS,
        Ok(Completion::NotShown) => ExitCode::from(2),
        Err(err) => {
            report_error(&err);
            ExitCode::from(1)
        }
    }
}

fn report_error(err: &traytoast::error::Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
