//! Runfile Model
//!
//! The resolved document handed to the option evaluator and the executor.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::runfile::scope::{Scope, ScopeId, Scopes, SHELL_ATTR};

/// An `OPTION` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunCmdOpt {
    /// Canonical name; the environment variable the evaluator binds
    pub name: String,
    pub short: Option<char>,
    pub long: Option<String>,
    /// Value placeholder; present for string options, absent for switches
    pub value: Option<String>,
    pub desc: String,
}

impl RunCmdOpt {
    pub fn is_bool(&self) -> bool {
        self.value.is_none()
    }
}

/// Configuration for a command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCmdConfig {
    pub shell: Option<String>,
    pub desc: Vec<String>,
    pub usages: Vec<String>,
    pub opts: Vec<RunCmdOpt>,
}

/// A command defined in the Runfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCmd {
    pub name: String,
    pub config: RunCmdConfig,
    pub scope: ScopeId,
    pub script: Vec<String>,
}

impl RunCmd {
    /// First line of the description, shown by `list`.
    pub fn title(&self) -> &str {
        self.config.desc.first().map(String::as_str).unwrap_or("")
    }

    /// False when there is nothing beyond the name to show in a help screen.
    pub fn enable_help(&self) -> bool {
        !self.config.desc.is_empty() || !self.config.usages.is_empty() || !self.config.opts.is_empty()
    }
}

/// The processed file, ready to run
#[derive(Debug, Clone)]
pub struct Runfile {
    scopes: Scopes,
    global: ScopeId,
    pub cmds: Vec<RunCmd>,
}

impl Runfile {
    pub fn new() -> Self {
        let mut scopes = Scopes::new();
        let global = scopes.push(None);
        Self {
            scopes,
            global,
            cmds: Vec::new(),
        }
    }

    pub fn global_id(&self) -> ScopeId {
        self.global
    }

    /// The global scope
    pub fn scope(&self) -> &Scope {
        self.scopes.get(self.global)
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    pub(crate) fn scopes_mut(&mut self) -> &mut Scopes {
        &mut self.scopes
    }

    /// Look a name up from a command's scope, falling back to the global one.
    pub fn lookup(&self, cmd: &RunCmd, name: &str) -> Option<&str> {
        self.scopes.lookup(cmd.scope, name)
    }

    /// The global `.SHELL`, when set and non-empty.
    pub fn default_shell(&self) -> Option<&str> {
        self.scope()
            .attrs
            .get(SHELL_ATTR)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The command's own SHELL, else the global `.SHELL`.
    pub fn shell_for<'a>(&'a self, cmd: &'a RunCmd) -> Option<&'a str> {
        cmd.config
            .shell
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.default_shell())
    }

    /// Find a command by case-insensitive name.
    pub fn command(&self, name: &str) -> Option<&RunCmd> {
        self.cmds.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Rewrite a command's display name. Used once, by main mode, so help
    /// screens show the invoking script's name.
    pub fn rename_command(&mut self, index: usize, name: impl Into<String>) {
        if let Some(cmd) = self.cmds.get_mut(index) {
            cmd.name = name.into();
        }
    }
}

impl Default for Runfile {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct RunfileJson<'a> {
    scope: &'a IndexMap<String, String>,
    commands: Vec<RunCmdJson<'a>>,
}

#[derive(Serialize)]
struct RunCmdJson<'a> {
    name: &'a str,
    shell: Option<&'a str>,
    config: &'a RunCmdConfig,
    scope: &'a IndexMap<String, String>,
    script: &'a [String],
}

impl Serialize for Runfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RunfileJson {
            scope: &self.scope().attrs,
            commands: self
                .cmds
                .iter()
                .map(|cmd| RunCmdJson {
                    name: &cmd.name,
                    shell: self.shell_for(cmd),
                    config: &cmd.config,
                    scope: &self.scopes.get(cmd.scope).attrs,
                    script: &cmd.script,
                })
                .collect(),
        }
        .serialize(serializer)
    }
}
