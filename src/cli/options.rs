//! Command Option Evaluation
//!
//! Turns a command's `OPTION` declarations into a runtime flag parser and
//! evaluates invocation arguments against it.
//!
//! Accepted forms follow the declarations:
//! - `-n value`, `-n=value`, `--name value`, `--name=value` for string options
//! - `-v`, `--verbose`, `-v=false`, `--verbose=true` for boolean switches
//! - a long form may also be spelled with one dash: `-name value`, `-verbose`
//! - the first positional argument, or `--`, ends option parsing

use std::collections::HashSet;

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction};
use indexmap::IndexMap;
use thiserror::Error;

use crate::runfile::{RunCmd, RunCmdOpt};

const HELP_ID: &str = "help";
const ARGS_ID: &str = "args";

/// Option evaluation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("duplicate option: -{0}")]
    DuplicateShort(char),

    #[error("duplicate option: --{0}")]
    DuplicateLong(String),

    #[error("{0}")]
    Invalid(String),
}

/// The implicit help aliases left after the declared options are registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpFlags {
    /// `-h` is reserved for help
    pub short: bool,
    /// `--help` is reserved for help
    pub long: bool,
}

impl HelpFlags {
    pub fn is_empty(&self) -> bool {
        !self.short && !self.long
    }
}

/// Compute which help aliases remain available. A declared short `h`
/// (case-sensitive) takes `-h`; a declared long `help` (any case) takes
/// `--help`.
pub fn help_flags(opts: &[RunCmdOpt]) -> HelpFlags {
    let short_taken = opts.iter().any(|o| o.short == Some('h'));
    let long_taken = opts
        .iter()
        .any(|o| o.long.as_deref().is_some_and(|l| l.eq_ignore_ascii_case("help")));
    HelpFlags {
        short: !short_taken,
        long: !long_taken,
    }
}

/// Result of evaluating a command's arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// An implicit help alias was given
    Help,
    /// Option bindings keyed by canonical name, plus the remaining arguments
    Run {
        env: IndexMap<String, String>,
        args: Vec<String>,
    },
}

fn option_id(index: usize) -> String {
    format!("opt{}", index)
}

/// Build the flag parser for a command.
pub fn build_parser(cmd: &RunCmd) -> Result<clap::Command, OptionError> {
    let mut shorts = HashSet::new();
    let mut longs = HashSet::new();
    let mut parser = clap::Command::new(cmd.name.clone())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true);

    for (index, opt) in cmd.config.opts.iter().enumerate() {
        let mut arg = Arg::new(option_id(index));
        if let Some(short) = opt.short {
            if !shorts.insert(short) {
                return Err(OptionError::DuplicateShort(short));
            }
            arg = arg.short(short);
        }
        if let Some(long) = &opt.long {
            let long = long.to_lowercase();
            if !longs.insert(long.clone()) {
                return Err(OptionError::DuplicateLong(long));
            }
            arg = arg.long(long);
        }
        arg = match &opt.value {
            Some(value) => arg
                .action(ArgAction::Set)
                .value_name(value.clone())
                .allow_hyphen_values(true),
            None => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_name("BOOL")
                .value_parser(BoolishValueParser::new()),
        };
        parser = parser.arg(arg);
    }

    let help = help_flags(&cmd.config.opts);
    if !help.is_empty() {
        let mut arg = Arg::new(HELP_ID).action(ArgAction::SetTrue);
        if help.short {
            arg = arg.short('h');
        }
        if help.long {
            arg = arg.long("help");
        }
        parser = parser.arg(arg);
    }

    Ok(parser.arg(
        Arg::new(ARGS_ID)
            .action(ArgAction::Append)
            .num_args(1..)
            .trailing_var_arg(true),
    ))
}

/// Find the declared option a single-dash or double-dash flag names.
fn lookup_flag<'a>(opts: &'a [RunCmdOpt], flag: &str) -> Option<&'a RunCmdOpt> {
    let name = flag.strip_prefix("--").or_else(|| flag.strip_prefix('-'))?;
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !flag.starts_with("--") => opts.iter().find(|o| o.short == Some(c)),
        (Some(_), Some(_)) => opts
            .iter()
            .find(|o| o.long.as_deref().is_some_and(|l| l.to_lowercase() == name)),
        _ => None,
    }
}

/// Spell single-dash long forms (`-name`, `-name=value`) with two dashes so
/// the flag parser sees them. Rewriting stops where option parsing stops.
fn expand_long_forms(opts: &[RunCmdOpt], help: HelpFlags, args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--" || arg == "-" || !arg.starts_with('-') {
            out.push(arg.clone());
            break;
        }
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (arg.as_str(), None),
        };
        let single_dash_long = !flag.starts_with("--") && flag.chars().count() > 2;
        match lookup_flag(opts, flag) {
            Some(opt) => {
                if single_dash_long {
                    out.push(format!("-{}", arg));
                } else {
                    out.push(arg.clone());
                }
                if !opt.is_bool() && inline.is_none() {
                    out.extend(iter.next().cloned());
                }
            }
            None if single_dash_long && help.long && flag.strip_prefix('-') == Some("help") => {
                out.push(format!("-{}", arg));
            }
            None => out.push(arg.clone()),
        }
    }
    out.extend(iter.cloned());
    out
}

/// Evaluate `args` against the command's declared options. Every option gets
/// a binding: string options their value (or empty), switches `1` (or empty).
pub fn evaluate_options(cmd: &RunCmd, args: &[String]) -> Result<Evaluation, OptionError> {
    let parser = build_parser(cmd)?;
    let help = help_flags(&cmd.config.opts);
    let args = expand_long_forms(&cmd.config.opts, help, args);
    let matches = parser.try_get_matches_from(&args).map_err(|e| {
        let rendered = e.to_string();
        let first = rendered.lines().next().unwrap_or_default();
        OptionError::Invalid(first.trim_start_matches("error: ").to_string())
    })?;

    if !help.is_empty() && matches.get_flag(HELP_ID) {
        return Ok(Evaluation::Help);
    }

    let mut env = IndexMap::new();
    for (index, opt) in cmd.config.opts.iter().enumerate() {
        let id = option_id(index);
        let value = if opt.is_bool() {
            let on = matches.get_one::<bool>(&id).copied().unwrap_or(false);
            if on { "1" } else { "" }.to_string()
        } else {
            matches.get_one::<String>(&id).cloned().unwrap_or_default()
        };
        env.insert(opt.name.clone(), value);
    }

    let rest = matches
        .get_many::<String>(ARGS_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    log::debug!("evaluated options for '{}': {:?}", cmd.name, env);
    Ok(Evaluation::Run { env, args: rest })
}
