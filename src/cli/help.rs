//! Help Text
//!
//! Every screen is rendered to a `String`; the binary decides where it goes.

use std::fmt::Write;

use crate::cli::commands::CommandTable;
use crate::cli::options::help_flags;
use crate::exec::DEFAULT_SHELL;
use crate::runfile::{RunCmd, RunCmdOpt, Runfile};

pub const RUNFILE_DEFAULT: &str = "Runfile";

/// Blank space as wide as `name` minus one column, used to line continuation
/// text up under the usage lines.
fn pad_for(name: &str) -> String {
    " ".repeat(name.chars().count().saturating_sub(1))
}

fn no_help(rf: &Runfile, cmd: &RunCmd) -> String {
    format!("{} ({}): No help available.\n", cmd.name, shell_label(rf, cmd))
}

fn shell_label<'a>(rf: &'a Runfile, cmd: &'a RunCmd) -> &'a str {
    rf.shell_for(cmd).unwrap_or(DEFAULT_SHELL)
}

/// Full help: header, description, then the usage screen.
pub fn cmd_help(rf: &Runfile, cmd: &RunCmd) -> String {
    if !cmd.enable_help() {
        return no_help(rf, cmd);
    }
    let mut out = format!("{} ({}):\n", cmd.name, shell_label(rf, cmd));
    for desc in &cmd.config.desc {
        let _ = writeln!(out, "  {}", desc);
    }
    out.push_str(&cmd_usage(rf, cmd));
    out
}

/// Usage lines and the options section.
pub fn cmd_usage(rf: &Runfile, cmd: &RunCmd) -> String {
    if !cmd.enable_help() {
        return no_help(rf, cmd);
    }
    let mut out = String::new();
    let pad = pad_for(&cmd.name);
    for (i, usage) in cmd.config.usages.iter().enumerate() {
        let or = if i == 0 {
            out.push_str("Usage:\n");
            "  "
        } else {
            "or"
        };
        if usage.starts_with('(') {
            let _ = writeln!(out, "       {} {}", pad, usage);
        } else {
            let _ = writeln!(out, "  {}   {} {}", or, cmd.name, usage);
        }
    }

    let opts = &cmd.config.opts;
    if !opts.is_empty() {
        out.push_str("Options:\n");
        let help = help_flags(opts);
        let aliases = match (help.short, help.long) {
            (true, true) => Some("-h, --help"),
            (true, false) => Some("-h"),
            (false, true) => Some("--help"),
            (false, false) => None,
        };
        if let Some(aliases) = aliases {
            let _ = writeln!(out, "  {}", aliases);
            out.push_str("        Show full help screen\n");
        }
    }
    for opt in opts {
        out.push_str(&option_line(opt));
        out.push('\n');
    }
    out
}

fn option_line(opt: &RunCmdOpt) -> String {
    let mut line = String::from("  ");
    if let Some(short) = opt.short {
        line.push('-');
        line.push(short);
    }
    if let Some(long) = &opt.long {
        if opt.short.is_some() {
            line.push_str(", ");
        }
        line.push_str("--");
        line.push_str(long);
    }
    if let Some(value) = &opt.value {
        let _ = write!(line, " <{}>", value);
    }
    if !opt.desc.is_empty() {
        // lone short switches keep the description on the same line
        if opt.short.is_some() && opt.long.is_none() && opt.value.is_none() {
            line.push_str("    ");
        } else {
            line.push_str("\n        ");
        }
        line.push_str(&opt.desc);
    }
    line
}

/// The `list` screen: every command with its title, then a short usage.
pub fn command_list(table: &CommandTable, me: &str) -> String {
    let mut out = String::from("Commands:\n");
    let width = table
        .entries()
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0);
    for entry in table.entries() {
        let _ = writeln!(out, "  {:<width$}    {}", entry.name, entry.title, width = width);
    }
    let pad = pad_for(me);
    out.push_str("Usage:\n");
    let _ = writeln!(out, "       {} [-r runfile] help <command>", me);
    let _ = writeln!(out, "       {} (show help for <command>)", pad);
    let _ = writeln!(out, "  or   {} [-r runfile] <command> [option ...]", me);
    let _ = writeln!(out, "       {} (run <command>)", pad);
    out
}

/// The tool's own usage screen.
pub fn tool_usage(me: &str) -> String {
    let pad = pad_for(me);
    let mut out = String::from("Usage:\n");
    let _ = writeln!(out, "       {} -h | --help", me);
    let _ = writeln!(out, "       {} (show help)", pad);
    let _ = writeln!(out, "  or   {} [-r runfile] list", me);
    let _ = writeln!(out, "       {} (list commands)", pad);
    let _ = writeln!(out, "  or   {} [-r runfile] help <command>", me);
    let _ = writeln!(out, "       {} (show help for <command>)", pad);
    let _ = writeln!(out, "  or   {} [-r runfile] <command> [option ...]", me);
    let _ = writeln!(out, "       {} (run <command>)", pad);
    out.push_str("Options:\n");
    out.push_str("  -h, --help\n");
    out.push_str("        Show help screen\n");
    out.push_str("  -r, --runfile <file>\n");
    let _ = writeln!(out, "        Specify runfile (default='{}')", RUNFILE_DEFAULT);
    out.push_str("      --json\n");
    out.push_str("        Print the resolved Runfile as JSON\n");
    out.push_str("Note:\n");
    out.push_str("  Values can be given as:\n");
    out.push_str("        -o value | -o=value | --opt value | --opt=value\n");
    out.push_str("  Long options also accept a single dash:  -opt value\n");
    out.push_str("  Switches accept an explicit value:  -v=false | --verbose=true\n");
    out.push_str("  '--' ends option parsing\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runfile::load;

    const RUNFILE: &str = "\
EXPORT .SHELL = bash
COMMAND greet {
  Greets someone.
  Politely.
  USAGE [-n <name>]
  USAGE (defaults to the current user)
  USAGE --loud
  OPTION -n, --name <NAME> \"Who to greet\"
  OPTION -q \"Quiet\"
  OPTION -h, --host <HOST>
}
{
  echo hi
}
CMD bare {
  true
}
";

    #[test]
    fn test_cmd_help() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let help = cmd_help(&rf, &rf.cmds[0]);
        let expected = "\
greet (bash):
  Greets someone.
  Politely.
Usage:
       greet [-n <name>]
            (defaults to the current user)
  or   greet --loud
Options:
  --help
        Show full help screen
  -n, --name <NAME>
        Who to greet
  -q    Quiet
  -h, --host <HOST>
";
        assert_eq!(help, expected);
    }

    #[test]
    fn test_no_help_available() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        assert_eq!(cmd_help(&rf, &rf.cmds[1]), "bare (bash): No help available.\n");

        let rf = load("CMD bare {\n  true\n}\n".as_bytes()).unwrap();
        assert_eq!(cmd_usage(&rf, &rf.cmds[0]), "bare (sh): No help available.\n");
    }

    #[test]
    fn test_both_help_aliases() {
        let rf = load("CMD x {\n  OPTION -v\n}\n{\n  true\n}\n".as_bytes()).unwrap();
        assert_eq!(
            cmd_usage(&rf, &rf.cmds[0]),
            "Options:\n  -h, --help\n        Show full help screen\n  -v\n"
        );
    }

    #[test]
    fn test_command_list() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let table = CommandTable::new(&rf);
        let list = command_list(&table, "run");
        let expected = concat!(
            "Commands:\n",
            "  list     (builtin) List available commands\n",
            "  help     (builtin) Show Help for a command\n",
            "  greet    Greets someone.\n",
            "  bare     \n",
            "Usage:\n",
            "       run [-r runfile] help <command>\n",
            "          (show help for <command>)\n",
            "  or   run [-r runfile] <command> [option ...]\n",
            "          (run <command>)\n",
        );
        assert_eq!(list, expected);
    }

    #[test]
    fn test_tool_usage() {
        let usage = tool_usage("run");
        assert!(usage.starts_with("Usage:\n       run -h | --help\n          (show help)\n"));
        assert!(usage.contains("Specify runfile (default='Runfile')"));
        assert!(usage.contains("-opt value\n"));
        assert!(usage.ends_with("'--' ends option parsing\n"));
    }
}
