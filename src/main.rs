use std::path::{Path, PathBuf};

use clap::Parser;

use run::cli::help::{tool_usage, RUNFILE_DEFAULT};
use run::cli::{main_command, plan, plan_command, Action, EXIT_USAGE};
use run::runfile::{load, Runfile};

#[derive(Parser, Debug)]
#[command(name = "run")]
#[command(about = "Run commands defined in a Runfile")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Show help screen
    #[arg(short = 'h', long = "help")]
    help: bool,

    /// Runfile to read (default: Runfile)
    #[arg(short = 'r', long = "runfile")]
    runfile: Option<PathBuf>,

    /// Print the resolved Runfile as JSON
    #[arg(long = "json")]
    json: bool,

    /// Command to run, followed by its options and arguments
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn usage_error(me: &str, message: &str) -> i32 {
    eprintln!("{}: {}", me, message);
    eprint!("{}", tool_usage(me));
    EXIT_USAGE
}

/// Parse the host flags. `Err` carries the exit status when the process
/// should stop here.
fn parse_cli(me: &str, args: &[String]) -> Result<Cli, i32> {
    let argv = std::iter::once(me.to_string()).chain(args.iter().cloned());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered.lines().next().unwrap_or_default();
            return Err(usage_error(me, message.trim_start_matches("error: ")));
        }
    };
    if cli.help {
        eprint!("{}", tool_usage(me));
        return Err(EXIT_USAGE);
    }
    Ok(cli)
}

fn read_runfile(me: &str, path: &Path) -> Result<Runfile, i32> {
    let bytes = std::fs::read(path).map_err(|e| {
        usage_error(me, &format!("Error reading file '{}': {}", path.display(), e))
    })?;
    load(&bytes).map_err(|e| {
        eprintln!("{}: {}: {}", me, path.display(), e);
        EXIT_USAGE
    })
}

fn perform(me: &str, action: Action) -> i32 {
    match action {
        Action::Show { text, code } => {
            eprint!("{}", text);
            code
        }
        Action::Run(invocation) => match invocation.run() {
            Ok(status) => status.code().unwrap_or(1),
            Err(e) => {
                eprintln!("{}: {}: {}", me, invocation.shell, e);
                1
            }
        },
    }
}

fn print_json(me: &str, rf: &Runfile) -> i32 {
    match serde_json::to_string_pretty(rf) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("{}: {}", me, e);
            1
        }
    }
}

fn real_main() -> i32 {
    let raw: Vec<String> = std::env::args().collect();
    let mut me = raw.first().map(|a| base_name(a)).unwrap_or_else(|| "run".to_string());
    let mut args: Vec<String> = raw.into_iter().skip(1).collect();

    // run shebang <file> [args...]
    let mut shebang_file = None;
    if args.first().is_some_and(|a| a.eq_ignore_ascii_case("shebang")) {
        args.remove(0);
        if !args.is_empty() {
            shebang_file = Some(args.remove(0));
        }
    }
    let shebang_file = shebang_file.filter(|f| base_name(f) != RUNFILE_DEFAULT);

    // Shebang mode reads the file before parsing arguments, so main mode can
    // hand them to the command untouched.
    let (rf, cli) = match shebang_file {
        Some(file) => {
            me = base_name(&file);
            let mut rf = match read_runfile(&me, Path::new(&file)) {
                Ok(rf) => rf,
                Err(code) => return code,
            };
            if let Some(index) = main_command(&rf) {
                log::debug!("main mode: running '{}' as '{}'", rf.cmds[index].name, me);
                rf.rename_command(index, me.clone());
                return perform(&me, plan_command(&rf, index, &args));
            }
            let cli = match parse_cli(&me, &args) {
                Ok(cli) => cli,
                Err(code) => return code,
            };
            if cli.runfile.is_some() {
                return usage_error(&me, "-r/--runfile is not available in shebang mode");
            }
            (rf, cli)
        }
        None => {
            let cli = match parse_cli(&me, &args) {
                Ok(cli) => cli,
                Err(code) => return code,
            };
            let path = cli
                .runfile
                .clone()
                .unwrap_or_else(|| PathBuf::from(RUNFILE_DEFAULT));
            match read_runfile(&me, &path) {
                Ok(rf) => (rf, cli),
                Err(code) => return code,
            }
        }
    };

    if cli.json {
        return print_json(&me, &rf);
    }

    let (name, rest) = match cli.command.split_first() {
        Some((name, rest)) => (Some(name.as_str()), rest),
        None => (None, &[][..]),
    };
    let action = plan(&rf, &me, name, rest);
    perform(&me, action)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    std::process::exit(real_main());
}
