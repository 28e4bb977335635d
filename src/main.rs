use std::process;

use clap::Parser;
use tracing::Level;

use reposync::cli::{execute, normalize_args, report, Cli, CliError};
use reposync::config::Settings;
use reposync::exitcode;
use reposync::infrastructure::ServiceContainer;

fn main() {
    let parsed = Cli::try_parse_from(normalize_args(std::env::args_os()));
    let repo_dir = parsed.as_ref().ok().map(|cli| cli.dir.clone());

    let ctx = match Settings::load(repo_dir.as_deref()).and_then(ServiceContainer::new) {
        Ok(ctx) => ctx,
        Err(e) => {
            let ctx = ServiceContainer::stderr(Settings::default(), Level::INFO);
            ctx.log.error("invalid configuration", &[("error", &e)]);
            process::exit(exitcode::FAILURE);
        }
    };

    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            process::exit(report(&CliError::InvalidArgs(message), &ctx));
        }
    };

    process::exit(execute(&cli, &ctx));
}
