//! Command Table
//!
//! The builtins followed by the Runfile's commands, in source order. The first
//! entry is the default when no command is given.

use crate::runfile::Runfile;

/// What a table entry dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    List,
    Help,
    /// Index into `Runfile::cmds`
    Runfile(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub title: String,
    pub kind: CommandKind,
}

#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn new(rf: &Runfile) -> Self {
        let mut entries = vec![
            CommandEntry {
                name: "list".to_string(),
                title: "(builtin) List available commands".to_string(),
                kind: CommandKind::List,
            },
            CommandEntry {
                name: "help".to_string(),
                title: "(builtin) Show Help for a command".to_string(),
                kind: CommandKind::Help,
            },
        ];
        entries.extend(rf.cmds.iter().enumerate().map(|(i, cmd)| CommandEntry {
            name: cmd.name.clone(),
            title: cmd.title().to_string(),
            kind: CommandKind::Runfile(i),
        }));
        Self { entries }
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// The command run when none is named.
    pub fn default_entry(&self) -> &CommandEntry {
        &self.entries[0]
    }
}

/// Index of the command main mode runs: the Runfile must define exactly one
/// command, named `main` in any case.
pub fn main_command(rf: &Runfile) -> Option<usize> {
    match rf.cmds.as_slice() {
        [only] if only.name.eq_ignore_ascii_case("main") => Some(0),
        _ => None,
    }
}
