//! Command dispatch and handlers

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::cli::args::{Cli, Commands, DependabotArgs, DetectArgs, SyncArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::usage::print_usage;
use crate::exitcode;
use crate::infrastructure::ServiceContainer;

/// A subcommand that runs against a resolved, existing directory.
pub trait RunCommand {
    fn run(&self, ctx: &ServiceContainer, dir: &Path) -> CliResult<()>;
}

/// Dispatch the parsed command line and return the process exit status.
pub fn execute(cli: &Cli, ctx: &ServiceContainer) -> i32 {
    match dispatch(cli, ctx) {
        Ok(()) => exitcode::OK,
        Err(e) => report(&e, ctx),
    }
}

/// Log an error the way the dispatcher does and return its exit status.
pub fn report(err: &CliError, ctx: &ServiceContainer) -> i32 {
    match err {
        CliError::Application(e) => ctx.log.error("command failed", &[("error", e)]),
        CliError::DirectoryNotFound(dir) => ctx
            .log
            .error("directory does not exist", &[("dir", &dir.display())]),
        CliError::UnknownCommand(name) => ctx.log.error("unknown command", &[("command", name)]),
        CliError::InvalidArgs(msg) => ctx.log.error("invalid arguments", &[("error", msg)]),
        CliError::MissingCommand | CliError::HelpRequested => {}
    }
    if err.shows_usage() {
        print_usage(&Cli::command(), ctx.usage.as_ref());
    }
    err.exit_code()
}

fn dispatch(cli: &Cli, ctx: &ServiceContainer) -> CliResult<()> {
    debug!("dispatch: dir={} command={:?}", cli.dir.display(), cli.command);
    if cli.help {
        return Err(CliError::HelpRequested);
    }
    if !ctx.fs.is_dir(&cli.dir) {
        return Err(CliError::DirectoryNotFound(cli.dir.clone()));
    }

    match &cli.command {
        None => Err(CliError::MissingCommand),
        Some(Commands::Detect(args)) => args.run(ctx, &cli.dir),
        Some(Commands::Dependabot(args)) => args.run(ctx, &cli.dir),
        Some(Commands::Sync(args)) => args.run(ctx, &cli.dir),
        Some(Commands::External(argv)) => {
            let name = argv
                .first()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Err(CliError::UnknownCommand(name))
        }
    }
}

impl RunCommand for DetectArgs {
    fn run(&self, ctx: &ServiceContainer, dir: &Path) -> CliResult<()> {
        ctx.log
            .info("Detecting project types", &[("dir", &dir.display())]);
        let detection = ctx.detect_service().detect(dir);

        for (project_type, dirs) in &detection.projects {
            let dirs = dirs.iter().join(",");
            ctx.log
                .info("Found project", &[("type", project_type), ("dirs", &dirs)]);
        }
        for (ecosystem, dirs) in &detection.ecosystems {
            let dirs = dirs.iter().join(",");
            ctx.log.info(
                "Found dependency ecosystem",
                &[("ecosystem", ecosystem), ("dirs", &dirs)],
            );
        }
        if detection.projects.is_empty() {
            ctx.log.info("No project types detected", &[]);
        }
        Ok(())
    }
}

impl RunCommand for DependabotArgs {
    fn run(&self, ctx: &ServiceContainer, dir: &Path) -> CliResult<()> {
        ctx.log.info(
            "Generating dependabot configuration",
            &[("dir", &dir.display())],
        );
        let settings = &ctx.settings.dependabot;
        let exclude: Vec<String> = settings
            .exclude
            .iter()
            .chain(&self.exclude)
            .cloned()
            .collect();

        let service = ctx.dependabot_service();
        let document = service.generate(dir, &exclude)?;
        if self.stdout {
            write_document(io::stdout().lock(), &document)?;
            return Ok(());
        }

        let output = dir.join(self.output.as_deref().unwrap_or(&settings.output));
        service.write(&output, &document)?;
        ctx.log.info(
            "Dependabot configuration generated",
            &[("path", &output.display())],
        );
        Ok(())
    }
}

/// Write a generated document to a stream, surfacing closed pipes as errors.
fn write_document<W: Write>(mut out: W, document: &str) -> ApplicationResult<()> {
    out.write_all(document.as_bytes())
        .and_then(|()| out.flush())
        .with_context("write dependabot configuration to stdout")
}

impl RunCommand for SyncArgs {
    fn run(&self, ctx: &ServiceContainer, dir: &Path) -> CliResult<()> {
        let templates = self
            .templates
            .as_deref()
            .unwrap_or(&ctx.settings.templates_dir);
        ctx.log.info(
            "Syncing templates",
            &[("dir", &dir.display()), ("templates", &templates.display())],
        );

        let report = ctx.sync_service().sync(dir, templates)?;
        ctx.log.info(
            "Sync completed",
            &[
                ("updated", &report.updated.len()),
                ("added", &report.added.len()),
                ("skipped", &report.skipped.len()),
            ],
        );
        Ok(())
    }
}
