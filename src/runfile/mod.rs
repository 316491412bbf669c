//! Runfile model and resolution
//!
//! `load` runs the whole pipeline: lex → parse → resolve.

pub mod scope;
pub mod types;
pub mod normalize;
pub mod process;

pub use process::{process_ast, BUILTIN_COMMANDS};
pub use scope::{Scope, ScopeId, Scopes, SHELL_ATTR};
pub use types::{RunCmd, RunCmdConfig, RunCmdOpt, Runfile};

use crate::error::RunfileError;

/// Turn a raw Runfile buffer into the resolved model.
pub fn load(input: &[u8]) -> Result<Runfile, RunfileError> {
    let doc = crate::parser::parse(input)?;
    log::trace!("parsed {} statement(s)", doc.statements.len());
    Ok(process_ast(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREET: &str = "\
EXPORT GREETING=hello
COMMAND greet
{
  OPTION -n, --name <NAME> \"Who to greet\"
}
{
  echo $GREETING, ${name}!
}
";

    #[test]
    fn test_load_end_to_end() {
        let rf = load(GREET.as_bytes()).unwrap();
        assert_eq!(rf.scope().attrs.get("GREETING").map(String::as_str), Some("hello"));
        assert_eq!(rf.cmds.len(), 1);

        let cmd = &rf.cmds[0];
        assert_eq!(cmd.name, "greet");
        assert_eq!(cmd.script, vec!["echo $GREETING, ${name}!"]);
        assert_eq!(
            cmd.config.opts,
            vec![RunCmdOpt {
                name: "name".into(),
                short: Some('n'),
                long: Some("name".into()),
                value: Some("NAME".into()),
                desc: "Who to greet".into(),
            }]
        );
        assert!(cmd.config.desc.is_empty());
        assert_eq!(rf.shell_for(cmd), None);
    }

    #[test]
    fn test_shell_fallback() {
        let input = "\
EXPORT .SHELL = bash
CMD a {
  SHELL zsh
}
{
  true
}
CMD b {
  true
}
";
        let rf = load(input.as_bytes()).unwrap();
        assert_eq!(rf.default_shell(), Some("bash"));
        assert_eq!(rf.shell_for(&rf.cmds[0]), Some("zsh"));
        assert_eq!(rf.shell_for(&rf.cmds[1]), Some("bash"));
    }

    #[test]
    fn test_late_exports_visible_through_lookup() {
        let input = "CMD a {\n  true\n}\nEXPORT LATE=1\n";
        let rf = load(input.as_bytes()).unwrap();
        assert_eq!(rf.lookup(&rf.cmds[0], "LATE"), Some("1"));
    }

    #[test]
    fn test_rename_command() {
        let mut rf = load("CMD main {\n  true\n}\n".as_bytes()).unwrap();
        rf.rename_command(0, "deploy.run");
        assert_eq!(rf.cmds[0].name, "deploy.run");
        assert!(rf.command("DEPLOY.RUN").is_some());
        assert!(rf.command("main").is_none());
    }

    #[test]
    fn test_json_view() {
        let rf = load(GREET.as_bytes()).unwrap();
        let json = serde_json::to_value(&rf).unwrap();
        assert_eq!(json["scope"]["GREETING"], "hello");
        assert_eq!(json["commands"][0]["name"], "greet");
        assert_eq!(json["commands"][0]["config"]["opts"][0]["short"], "n");
        assert_eq!(json["commands"][0]["script"][0], "echo $GREETING, ${name}!");
    }
}
