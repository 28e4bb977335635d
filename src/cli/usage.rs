//! Usage text rendered from the clap command model

use std::fmt::Write as _;

use clap::{Arg, Command};
use itertools::Itertools;

use crate::infrastructure::logger::Logger;

/// Flag column width, including indentation.
const FLAG_WIDTH: usize = 24;

/// Usage text: global flags with defaults, then each command and its options.
pub fn render_usage(cmd: &Command) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Usage: {} [flags] <command> [options]", cmd.get_name());
    if let Some(about) = cmd.get_about() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{about}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Flags:");
    for arg in visible_args(cmd) {
        let _ = writeln!(out, "{}", render_flag(arg, 2));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Commands:");
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
        let _ = writeln!(out, "  {:<width$}{}", sub.get_name(), about, width = FLAG_WIDTH - 2);
        for arg in visible_args(sub).filter(|a| !a.is_global_set()) {
            let _ = writeln!(out, "{}", render_flag(arg, 4));
        }
    }
    out
}

/// Emit the usage text one line at a time.
pub fn print_usage(cmd: &Command, log: &dyn Logger) {
    for line in render_usage(cmd).lines() {
        log.info(line, &[]);
    }
}

fn visible_args(cmd: &Command) -> impl Iterator<Item = &Arg> {
    cmd.get_arguments()
        .filter(|a| !a.is_hide_set() && !a.is_positional())
}

fn render_flag(arg: &Arg, indent: usize) -> String {
    let mut flag = match arg.get_long() {
        Some(long) => format!("-{long}"),
        None => arg
            .get_short()
            .map(|c| format!("-{c}"))
            .unwrap_or_else(|| arg.get_id().to_string()),
    };
    if arg.get_action().takes_values() {
        let value = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| name.to_string())
            .unwrap_or_else(|| arg.get_id().as_str().to_uppercase());
        let _ = write!(flag, " <{value}>");
    }

    let mut line = format!("{:indent$}{:<width$}", "", flag, width = FLAG_WIDTH - indent);
    if let Some(help) = arg.get_help() {
        line.push_str(&help.to_string());
    }
    let defaults = arg.get_default_values();
    if !defaults.is_empty() {
        let defaults = defaults.iter().map(|d| d.to_string_lossy()).join(",");
        let _ = write!(line, " (default: {defaults})");
    }
    line.trim_end().to_string()
}
