use std::{env, fs};

use anyhow::Context;
use stride::{
    config::Config,
    sandbox::{ExecuteRequest, Language, SandboxClient, StageOutput},
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub struct Args {
    pub language: Language,
    pub source_path: String,
    pub stdin_path: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let language = args
        .next()
        .context("language is required, e.g. python, js, rust")?
        .parse::<Language>()?;
    let source_path = args.next().context("source file is required")?;
    let stdin_path = args.next();

    Ok(Args {
        language,
        source_path,
        stdin_path,
    })
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Usage: run_snippet <language> <source_file> [stdin_file]");
            return Err(e);
        }
    };
    let config = Config::from_env().context("failed to read configuration")?;

    let source = fs::read_to_string(&args.source_path)
        .context(format!("failed to read {}", args.source_path))?;
    let mut request = ExecuteRequest::new(args.language, source);
    if let Some(path) = &args.stdin_path {
        request = request.with_stdin(
            fs::read_to_string(path).context(format!("failed to read stdin from {}", path))?,
        );
    }

    let client = SandboxClient::new(config.sandbox_url, config.sandbox_timeout);
    let response = client
        .execute(&request)
        .context(format!("could not run {} on {}", args.source_path, client.url()))?;

    println!(
        "ran {BOLD}{}{RESET} with {} {}\n",
        args.source_path, response.language, response.version
    );
    if let Some(compile) = &response.compile {
        print_stage("compile", compile);
    }
    print_stage("run", &response.run);

    if !response.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_stage(name: &str, stage: &StageOutput) {
    if !stage.stdout.is_empty() {
        println!("{BOLD}{name} stdout{RESET}\n{}", stage.stdout);
    }
    if !stage.stderr.is_empty() {
        println!("{BOLD}{name} stderr{RESET}\n{}", stage.stderr);
    }
    match (&stage.code, &stage.signal) {
        (Some(code), _) => println!("{name} exited with code {BOLD}{code}{RESET}"),
        (None, Some(signal)) => println!("{name} killed by {BOLD}{signal}{RESET}"),
        (None, None) => println!("{name} finished without an exit code"),
    }
    if let Some(time) = stage.time {
        println!("{name} took {:.0} ms", time);
    }
    println!();
}
