//! Script Execution
//!
//! A command runs as `<shell> -c <script> <name> <args...>`. The child inherits
//! the process environment, overlaid with the command's flattened scope and
//! then with its option bindings.

use std::io;
use std::process::{Command, ExitStatus};

use indexmap::IndexMap;

use crate::runfile::{RunCmd, Runfile};

/// Shell used when neither the command nor the Runfile names one.
pub const DEFAULT_SHELL: &str = "sh";

/// Everything needed to spawn one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub shell: String,
    pub script: String,
    pub args: Vec<String>,
    /// Variables set on top of the inherited environment
    pub env: IndexMap<String, String>,
}

impl Invocation {
    pub fn new(
        rf: &Runfile,
        cmd: &RunCmd,
        bindings: IndexMap<String, String>,
        args: Vec<String>,
    ) -> Self {
        let mut env = rf.scopes().flatten(cmd.scope);
        env.extend(bindings);
        Self {
            name: cmd.name.clone(),
            shell: rf.shell_for(cmd).unwrap_or(DEFAULT_SHELL).to_string(),
            script: cmd.script.join("\n"),
            args,
            env,
        }
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(&self.script)
            .arg(&self.name)
            .args(&self.args)
            .envs(&self.env);
        command
    }

    /// Run to completion with inherited stdio.
    pub fn run(&self) -> io::Result<ExitStatus> {
        log::debug!("running '{}' with {} {:?}", self.name, self.shell, self.args);
        self.command().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runfile::load;
    use std::ffi::OsStr;

    const RUNFILE: &str = "\
EXPORT TARGET=global
EXPORT KEEP=yes
CMD deploy {
  EXPORT TARGET=local
  OPTION -n, --name <NAME>
}
{
  echo one
  echo two
}
";

    #[test]
    fn test_environment_layers() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let cmd = &rf.cmds[0];
        let bindings: IndexMap<_, _> = [("name".to_string(), "Bob".to_string()), ("KEEP".to_string(), "no".to_string())]
            .into_iter()
            .collect();
        let inv = Invocation::new(&rf, cmd, bindings, vec!["x".into()]);
        assert_eq!(inv.env.get("TARGET").map(String::as_str), Some("local"));
        assert_eq!(inv.env.get("KEEP").map(String::as_str), Some("no"));
        assert_eq!(inv.env.get("name").map(String::as_str), Some("Bob"));
        assert_eq!(inv.shell, "sh");
        assert_eq!(inv.script, "echo one\necho two");
    }

    #[test]
    fn test_command_line() {
        let rf = load(RUNFILE.as_bytes()).unwrap();
        let inv = Invocation::new(&rf, &rf.cmds[0], IndexMap::new(), vec!["a".into(), "b c".into()]);
        let command = inv.command();
        assert_eq!(command.get_program(), OsStr::new("sh"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            vec![
                OsStr::new("-c"),
                OsStr::new("echo one\necho two"),
                OsStr::new("deploy"),
                OsStr::new("a"),
                OsStr::new("b c"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_exit_status() {
        let rf = load("CMD fail {\n  [ \"$CODE\" = \"3\" ] && exit 3\n  exit 1\n}\n".as_bytes()).unwrap();
        let bindings: IndexMap<_, _> = [("CODE".to_string(), "3".to_string())].into_iter().collect();
        let inv = Invocation::new(&rf, &rf.cmds[0], bindings, Vec::new());
        let status = inv.run().unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
