//! campus - interactive shell for the Campus social client
//!
//! Reads one command per line from stdin and prints results to stdout.
//! The signed-in identity is kept on disk between runs; posts live only
//! for the session.

use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};
use campus_shell::{load_config, parse, Flow, OutputFormat, Session};
use clap::Parser;
use libcampus::logging::{LogFormat, LoggingConfig};
use libcampus::AppStore;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "campus")]
#[command(version, about = "Interactive shell for the Campus social client")]
#[command(long_about = r#"Interactive shell for the Campus social client.

Reads commands from stdin, one per line. Type 'help' inside the shell for
the command list.

EXAMPLES:
    # Start an interactive session
    campus

    # Script a session
    printf 'login student 2023001 pw\npost Hello campus\nfeed\n' | campus

    # Machine-readable output
    echo 'trends' | campus --json

EXIT CODES:
    0 - Success
    1 - Storage or configuration error
    2 - Command required a signed-in user (non-interactive only)
    3 - Invalid input (non-interactive only)
"#)]
struct Args {
    /// Path to the config file
    #[arg(short, long, env = "CAMPUS_CONFIG", value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Directory for persisted session data (overrides the config file)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Print results as JSON, one document per command
    #[arg(long)]
    json: bool,

    /// Log output format
    #[arg(long, default_value = "text", env = "CAMPUS_LOG_FORMAT", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json", "pretty"])]
    log_format: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let format: LogFormat = args.log_format.parse().unwrap_or(LogFormat::Text);
    LoggingConfig::from_env(format, args.verbose).init();

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<i32> {
    let config = load_config(args.config.as_deref(), args.data_dir.as_deref())
        .context("Failed to load config")?;

    let store = AppStore::open(&config)
        .await
        .context("Failed to open session storage")?;

    let output = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut session = Session::new(store, output);

    let interactive = std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    let mut exit_code = 0;

    loop {
        if interactive {
            print!("{}", session.prompt());
            stdout.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let result = match parse(&line) {
            Ok(command) => session.execute(command, &mut stdout).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                tracing::debug!(error = ?e, "Command failed");
                // Scripts see the last failure; interactive sessions keep going
                if !interactive {
                    exit_code = e.exit_code();
                }
            }
        }
    }

    Ok(exit_code)
}
