//! Host command line
//!
//! [`plan`] decides what an invocation does without touching the process: the
//! binary prints the screen or spawns the script it gets back.

pub mod commands;
pub mod help;
pub mod options;

pub use commands::{main_command, CommandEntry, CommandKind, CommandTable};
pub use options::{evaluate_options, help_flags, Evaluation, HelpFlags, OptionError};

use crate::exec::Invocation;
use crate::runfile::Runfile;

/// Exit status for usage, help and lookup failures
pub const EXIT_USAGE: i32 = 2;

/// Outcome of dispatching one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print `text` to stderr and exit with `code`
    Show { text: String, code: i32 },
    /// Spawn the command's shell
    Run(Invocation),
}

impl Action {
    fn show(text: String, code: i32) -> Self {
        Action::Show { text, code }
    }
}

fn not_found(table: &CommandTable, me: &str, name: &str) -> Action {
    log::warn!("command not found: {}", name);
    Action::show(
        format!("{}: command not found: {}\n{}", me, name, help::command_list(table, me)),
        EXIT_USAGE,
    )
}

/// Dispatch `name` (or the default command) with its arguments.
pub fn plan(rf: &Runfile, me: &str, name: Option<&str>, args: &[String]) -> Action {
    let table = CommandTable::new(rf);
    let name = name.unwrap_or(table.default_entry().name.as_str()).to_lowercase();
    let entry = match table.find(&name) {
        Some(entry) => entry,
        None => return not_found(&table, me, &name),
    };

    match entry.kind {
        CommandKind::List => Action::show(help::command_list(&table, me), 0),
        CommandKind::Help => {
            let target = args.first().map(|s| s.to_lowercase()).unwrap_or_else(|| "help".to_string());
            match table.find(&target).map(|e| e.kind) {
                Some(CommandKind::List) => Action::show(help::command_list(&table, me), EXIT_USAGE),
                Some(CommandKind::Help) => Action::show(help::tool_usage(me), EXIT_USAGE),
                Some(CommandKind::Runfile(i)) => {
                    Action::show(help::cmd_help(rf, &rf.cmds[i]), EXIT_USAGE)
                }
                None => not_found(&table, me, &target),
            }
        }
        CommandKind::Runfile(i) => plan_command(rf, i, args),
    }
}

/// Evaluate the options of `rf.cmds[index]` and prepare it to run. Main mode
/// comes straight here, bypassing the table.
pub fn plan_command(rf: &Runfile, index: usize, args: &[String]) -> Action {
    let cmd = match rf.cmds.get(index) {
        Some(cmd) => cmd,
        None => return Action::show(format!("no command at index {}\n", index), EXIT_USAGE),
    };
    match evaluate_options(cmd, args) {
        Ok(Evaluation::Help) => Action::show(help::cmd_help(rf, cmd), EXIT_USAGE),
        Ok(Evaluation::Run { env, args }) => Action::Run(Invocation::new(rf, cmd, env, args)),
        Err(e) => Action::show(
            format!("{}: {}\n{}", cmd.name, e, help::cmd_usage(rf, cmd)),
            EXIT_USAGE,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runfile::load;

    const RUNFILE: &str = "\
CMD greet {
  Say hello.
  OPTION -n, --name <NAME>
}
{
  echo hello ${name}
}
";

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn shown(action: Action) -> (String, i32) {
        match action {
            Action::Show { text, code } => (text, code),
            other => panic!("expected a screen, got {:?}", other),
        }
    }

    #[test]
    fn test_default_is_list() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let (text, code) = shown(plan(&rf, "run", None, &[]));
        assert!(text.starts_with("Commands:\n"));
        assert!(text.contains("  greet    Say hello.\n"));
        assert_eq!(code, 0);
    }

    #[test]
    fn test_run_command() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        match plan(&rf, "run", Some("GREET"), &args(&["--name", "Ann", "rest"])) {
            Action::Run(inv) => {
                assert_eq!(inv.name, "greet");
                assert_eq!(inv.env.get("name").map(String::as_str), Some("Ann"));
                assert_eq!(inv.args, vec!["rest"]);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_help_for_command() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let (text, code) = shown(plan(&rf, "run", Some("help"), &args(&["greet"])));
        assert!(text.starts_with("greet (sh):\n  Say hello.\n"));
        assert_eq!(code, EXIT_USAGE);

        let (text, _) = shown(plan(&rf, "run", Some("greet"), &args(&["-h"])));
        assert!(text.starts_with("greet (sh):\n"));

        let (text, _) = shown(plan(&rf, "run", Some("help"), &[]));
        assert!(text.starts_with("Usage:\n       run -h | --help\n"));
    }

    #[test]
    fn test_unknown_command() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let (text, code) = shown(plan(&rf, "run", Some("deploy"), &[]));
        assert!(text.starts_with("run: command not found: deploy\nCommands:\n"));
        assert_eq!(code, EXIT_USAGE);

        let (text, _) = shown(plan(&rf, "run", Some("help"), &args(&["nope"])));
        assert!(text.starts_with("run: command not found: nope\n"));
    }

    #[test]
    fn test_main_mode_command() {
        let mut rf = load("CMD main {\n  OPTION -f, --force\n}\n{\n  rm -r build\n}\n".as_bytes()).unwrap();
        let index = main_command(&rf).unwrap();
        rf.rename_command(index, "clean");
        match plan_command(&rf, index, &args(&["-f", "now"])) {
            Action::Run(inv) => {
                assert_eq!(inv.name, "clean");
                assert_eq!(inv.env.get("force").map(String::as_str), Some("1"));
                assert_eq!(inv.args, vec!["now"]);
            }
            other => panic!("expected run, got {:?}", other),
        }
        let (text, _) = shown(plan_command(&rf, index, &args(&["--help"])));
        assert!(text.starts_with("clean (sh):\n"));
    }

    #[test]
    fn test_option_error_shows_usage() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let (text, code) = shown(plan(&rf, "run", Some("greet"), &args(&["--bogus"])));
        assert!(text.starts_with("greet: "));
        assert!(text.contains("Options:\n"));
        assert_eq!(code, EXIT_USAGE);
    }
}
