use std::path::Path;

use run::cli::{help, plan, Action, CommandTable};
use run::error::{RunfileError, SemanticError};
use run::runfile::{load, Runfile};

fn fixture() -> Runfile {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Runfile");
    let bytes = std::fs::read(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    load(&bytes).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn fixture_resolves() {
    let rf = fixture();
    let names: Vec<_> = rf.cmds.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["build", "clean", "greet"]);

    assert_eq!(rf.default_shell(), Some("bash"));
    assert_eq!(rf.scope().attrs.get("APP").map(String::as_str), Some("demo-app"));
    assert_eq!(rf.scope().attrs.get("OUT_DIR").map(String::as_str), Some("target/out"));

    let build = &rf.cmds[0];
    assert_eq!(
        build.config.desc,
        vec!["Build the application.", "", "Writes artifacts to $OUT_DIR."]
    );
    assert_eq!(build.config.usages.len(), 2);
    assert_eq!(build.config.opts[0].name, "release");
    assert!(build.config.opts[0].is_bool());
    assert_eq!(build.config.opts[1].name, "triple");
    assert_eq!(rf.lookup(build, "PROFILE"), Some("dev"));
    assert_eq!(rf.lookup(&rf.cmds[1], "PROFILE"), None);
    assert_eq!(build.script.first().map(String::as_str), Some("mkdir -p \"$OUT_DIR\""));
    assert_eq!(build.script.get(2).map(String::as_str), Some("  PROFILE=release"));
    assert_eq!(build.script.len(), 5);

    let greet = &rf.cmds[2];
    assert_eq!(rf.shell_for(greet), Some("sh"));
    assert_eq!(greet.script, vec!["echo \"Hello, ${n:-world}\""]);
}

#[test]
fn fixture_list_screen() {
    let rf = fixture();
    let list = help::command_list(&CommandTable::new(&rf), "run");
    assert!(list.contains("  build    Build the application.\n"));
    assert!(list.contains("  clean    \n"));
}

#[test]
fn fixture_runs_build_with_options() {
    let rf = fixture();
    match plan(&rf, "run", Some("build"), &args(&["-r", "--target=x86_64", "extra"])) {
        Action::Run(inv) => {
            assert_eq!(inv.shell, "bash");
            assert_eq!(inv.env.get("release").map(String::as_str), Some("1"));
            assert_eq!(inv.env.get("triple").map(String::as_str), Some("x86_64"));
            assert_eq!(inv.env.get("PROFILE").map(String::as_str), Some("dev"));
            assert_eq!(inv.env.get("APP").map(String::as_str), Some("demo-app"));
            assert_eq!(inv.args, vec!["extra"]);
        }
        other => panic!("expected run, got {:?}", other),
    }
}

#[test]
fn fixture_json_view() {
    let rf = fixture();
    let json = serde_json::to_value(&rf).unwrap();
    assert_eq!(json["scope"][".SHELL"], "bash");
    assert_eq!(json["commands"][2]["shell"], "sh");
    assert_eq!(json["commands"][0]["scope"]["PROFILE"], "dev");
}

#[test]
fn unterminated_option_description_is_lexical() {
    let src = "CMD x {\n  OPTION -v \"never closed\n}\n{\n  true\n}\n";
    match load(src.as_bytes()) {
        Err(RunfileError::Lexical(e)) => {
            assert_eq!((e.line, e.column), (2, 13));
        }
        other => panic!("expected a lexical error, got {:?}", other),
    }
}

#[test]
fn errors_carry_positions() {
    let err = load("CMD a {\n  true\n}\nCMD A {\n  true\n}\n".as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "semantic error at line 4, column 5: duplicate command: A");

    let err = load("EXPORT = 1\n".as_bytes()).unwrap_err();
    assert!(matches!(err, RunfileError::Syntax(_)));
}

#[test]
fn config_close_and_script_open_share_a_line() {
    let rf = load("CMD x {\n  Desc here.\n} {\n  echo hi\n}\n".as_bytes()).unwrap();
    assert_eq!(rf.cmds[0].config.desc, vec!["Desc here."]);
    assert_eq!(rf.cmds[0].script, vec!["echo hi"]);
}

#[test]
fn brace_groups_stay_in_the_script() {
    let src = "CMD x {\n  f() {\n    echo a\n  }\n  { f; }\n}\n";
    let rf = load(src.as_bytes()).unwrap();
    let cmd = &rf.cmds[0];
    assert!(cmd.config.desc.is_empty());
    assert_eq!(cmd.script, vec!["f() {", "  echo a", "}", "{ f; }"]);
}

#[test]
fn exports_and_commands_share_names() {
    let err = load("EXPORT help=1\n".as_bytes()).unwrap_err();
    assert!(matches!(err, RunfileError::Semantic(SemanticError::ReservedName { .. })));

    let err = load("EXPORT build=1\nCMD build {\n  make\n}\n".as_bytes()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "semantic error at line 2, column 5: name 'build' is already used by an export"
    );
}
