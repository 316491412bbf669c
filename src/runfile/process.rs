//! AST Processor
//!
//! Walks the document once, left to right, building the global scope, one
//! child scope per command and the final command list.
//!
//! Command and export names share one case-insensitive namespace that also
//! holds the builtins. Exports may be redefined; a command may not reuse an
//! export's name, nor an export a command's. Dotted attributes such as
//! `.SHELL` stay out of the namespace.

use std::collections::HashSet;

use crate::ast::types::{
    CommandDefNode, ConfigItemNode, DocumentNode, ExportNode, OptionConfigNode, Position, StatementNode,
};
use crate::error::SemanticError;
use crate::runfile::normalize::{normalize_cmd_desc, normalize_cmd_script};
use crate::runfile::scope::ScopeId;
use crate::runfile::types::{RunCmd, RunCmdConfig, RunCmdOpt, Runfile};

/// Commands provided by the tool itself; Runfile names may not reuse them.
pub const BUILTIN_COMMANDS: &[&str] = &["list", "help"];

/// Resolve a parsed document into a [`Runfile`].
pub fn process_ast(doc: &DocumentNode) -> Result<Runfile, SemanticError> {
    let mut processor = Processor::new();
    for statement in &doc.statements {
        match statement {
            StatementNode::Export(export) => {
                let global = processor.runfile.global_id();
                processor.process_export(global, export)?;
            }
            StatementNode::Command(cmd) => processor.process_command(cmd)?,
        }
    }
    log::debug!("resolved {} command(s)", processor.runfile.cmds.len());
    Ok(processor.runfile)
}

struct Processor {
    runfile: Runfile,
    /// Lower-cased command names registered so far
    commands: HashSet<String>,
    /// Lower-cased export names seen so far, at any scope
    exports: HashSet<String>,
}

impl Processor {
    fn new() -> Self {
        Self {
            runfile: Runfile::new(),
            commands: HashSet::new(),
            exports: HashSet::new(),
        }
    }

    fn check_reserved(name: &str, key: &str, position: Position) -> Result<(), SemanticError> {
        if BUILTIN_COMMANDS.contains(&key) {
            return Err(SemanticError::ReservedName {
                name: name.to_string(),
                line: position.line,
                column: position.column,
            });
        }
        Ok(())
    }

    fn register_command(&mut self, cmd: &CommandDefNode) -> Result<(), SemanticError> {
        let key = cmd.name.to_lowercase();
        Self::check_reserved(&cmd.name, &key, cmd.position)?;
        if self.exports.contains(&key) {
            return Err(SemanticError::NameCollision {
                name: cmd.name.clone(),
                other: "an export",
                line: cmd.position.line,
                column: cmd.position.column,
            });
        }
        if !self.commands.insert(key) {
            return Err(SemanticError::DuplicateCommand {
                name: cmd.name.clone(),
                line: cmd.position.line,
                column: cmd.position.column,
            });
        }
        Ok(())
    }

    fn register_export(&mut self, export: &ExportNode) -> Result<(), SemanticError> {
        if export.name.starts_with('.') {
            return Ok(());
        }
        let key = export.name.to_lowercase();
        Self::check_reserved(&export.name, &key, export.position)?;
        if self.commands.contains(&key) {
            return Err(SemanticError::NameCollision {
                name: export.name.clone(),
                other: "a command",
                line: export.position.line,
                column: export.position.column,
            });
        }
        self.exports.insert(key);
        Ok(())
    }

    fn process_export(&mut self, scope: ScopeId, export: &ExportNode) -> Result<(), SemanticError> {
        self.register_export(export)?;
        log::debug!("export {}={:?}", export.name, export.value.text);
        self.runfile
            .scopes_mut()
            .set(scope, export.name.as_str(), export.value.text.as_str());
        Ok(())
    }

    fn process_command(&mut self, cmd: &CommandDefNode) -> Result<(), SemanticError> {
        self.register_command(cmd)?;
        let global = self.runfile.global_id();
        let scope = self.runfile.scopes_mut().push(Some(global));

        let mut config = RunCmdConfig::default();
        for item in cmd.config.iter().flatten() {
            self.process_config_item(scope, &mut config, item)?;
        }
        config.desc = normalize_cmd_desc(config.desc);

        log::debug!("registered command '{}'", cmd.name);
        self.runfile.cmds.push(RunCmd {
            name: cmd.name.clone(),
            config,
            scope,
            script: normalize_cmd_script(cmd.script.lines.clone()),
        });
        Ok(())
    }

    fn process_config_item(
        &mut self,
        scope: ScopeId,
        config: &mut RunCmdConfig,
        item: &ConfigItemNode,
    ) -> Result<(), SemanticError> {
        match item {
            ConfigItemNode::Shell(shell) => config.shell = Some(shell.shell.text.clone()),
            ConfigItemNode::Usage(usage) => config.usages.push(usage.text.clone()),
            ConfigItemNode::Option(opt) => config.opts.push(build_opt(opt)),
            ConfigItemNode::Desc(desc) => config.desc.push(desc.text.clone()),
            ConfigItemNode::Export(export) => self.process_export(scope, export)?,
        }
        Ok(())
    }
}

/// The canonical name is the declared one, else the long form, else the short.
fn build_opt(opt: &OptionConfigNode) -> RunCmdOpt {
    let name = opt
        .name
        .clone()
        .or_else(|| opt.long.clone())
        .or_else(|| opt.short.map(String::from))
        .unwrap_or_default();
    RunCmdOpt {
        name,
        short: opt.short,
        long: opt.long.clone(),
        value: opt.value.clone(),
        desc: opt.desc.clone().unwrap_or_default(),
    }
}
