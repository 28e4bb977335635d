//! CLI argument definitions using clap

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Flags that may be spelled Go style with a single dash (`-dir x`, `-dir=x`).
const LONG_FLAGS: &[&str] = &["dir", "help", "output", "exclude", "stdout", "templates"];

/// Detect project types, generate dependabot configuration and sync workflow templates
#[derive(Parser, Debug)]
#[command(name = "reposync")]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
#[command(allow_external_subcommands = true)]
pub struct Cli {
    /// Target directory
    #[arg(long, global = true, default_value = ".", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Show usage
    #[arg(short, long, global = true, default_value_t = false)]
    pub help: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect project types and dependency ecosystems
    #[command(disable_help_flag = true)]
    Detect(DetectArgs),

    /// Generate dependabot configuration from detected ecosystems
    #[command(disable_help_flag = true)]
    Dependabot(DependabotArgs),

    /// Sync workflow and file templates into the repository
    #[command(disable_help_flag = true)]
    Sync(SyncArgs),

    /// Anything else; reported as an unknown command
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

#[derive(Args, Debug, Default)]
pub struct DetectArgs {}

#[derive(Args, Debug, Default)]
pub struct DependabotArgs {
    /// Output file, relative to the target directory
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Directory patterns to leave out, added to the configured ones
    #[arg(long, value_name = "PATTERN", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Print the document instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Template directory
    #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub templates: Option<PathBuf>,
}

/// Rewrite single-dash long flags to clap's double-dash form.
///
/// The program name and everything after `--` pass through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            normalized.push(arg);
            continue;
        }
        if arg.to_str() == Some("--") {
            passthrough = true;
            normalized.push(arg);
            continue;
        }
        match arg.to_str().and_then(normalize_flag) {
            Some(flag) => normalized.push(OsString::from(flag)),
            None => normalized.push(arg),
        }
    }
    normalized
}

fn normalize_flag(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name).then(|| format!("-{arg}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_go_style_flags_when_normalized_then_double_dash() {
        let args = strings(normalize_args([
            "reposync",
            "-dir",
            "x",
            "-exclude=/tools",
            "-h",
            "detect",
        ]));
        assert_eq!(
            args,
            vec!["reposync", "--dir", "x", "--exclude=/tools", "-h", "detect"]
        );
    }

    #[test]
    fn given_args_after_double_dash_when_normalized_then_untouched() {
        let args = strings(normalize_args(["reposync", "foo", "--", "-dir"]));
        assert_eq!(args, vec!["reposync", "foo", "--", "-dir"]);
    }

    #[test]
    fn given_no_args_when_parsed_then_defaults() {
        let cli = parse(&["reposync"]);
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.help);
        assert!(cli.command.is_none());
    }

    #[test]
    fn given_dir_after_command_when_parsed_then_global_flag_applies() {
        let cli = parse(&["reposync", "detect", "-dir", "/tmp"]);
        assert_eq!(cli.dir, PathBuf::from("/tmp"));
        assert!(matches!(cli.command, Some(Commands::Detect(_))));
    }

    #[test]
    fn given_dependabot_options_when_parsed_then_excludes_split() {
        let cli = parse(&[
            "reposync",
            "dependabot",
            "-exclude",
            "tools,/scripts",
            "--exclude",
            "src/*/gen",
            "-stdout",
        ]);
        let Some(Commands::Dependabot(args)) = cli.command else {
            panic!("expected dependabot");
        };
        assert_eq!(args.exclude, vec!["tools", "/scripts", "src/*/gen"]);
        assert!(args.stdout);
        assert!(args.output.is_none());
    }

    #[test]
    fn given_unknown_command_when_parsed_then_external() {
        let cli = parse(&["reposync", "foo", "bar"]);
        let Some(Commands::External(argv)) = cli.command else {
            panic!("expected external subcommand");
        };
        assert_eq!(argv, vec![OsString::from("foo"), OsString::from("bar")]);
    }

    #[test]
    fn given_help_flag_when_parsed_then_set_without_exiting() {
        assert!(parse(&["reposync", "-help"]).help);
        assert!(parse(&["reposync", "-h", "sync"]).help);
    }
}
