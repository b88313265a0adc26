use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use common::constants::{self, DEFAULT_ELEVATE_PROGRAM};
use common::{dotenv_init, http_client, send_gotify, GotifyConfig, LocalExecutor, UpdateError};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod detector;
mod parsers;
mod reporter;
mod types;
mod updater;


use types::UpdateOutcome;
use updater::{plan, Updater};

/// Update the host's packages with whatever package manager it has
#[derive(Parser, Debug)]
#[command(name = "offdroid")]
#[command(about = "Detect the system package manager, install updates and list what changed")]
struct Args {
    /// Skip the confirmation prompt (use with caution!)
    #[arg(long, short = 'y')]
    yes: bool,

    /// Dry-run mode - show the commands that would run without running them
    #[arg(long)]
    dry_run: bool,

    /// Print the outcome as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Don't echo package manager output while it runs
    #[arg(long)]
    quiet: bool,

    /// Privilege escalation program for apt, zypper, dnf and pacman ("" disables it)
    #[arg(long, env = constants::env::OFFDROID_ELEVATE, default_value = DEFAULT_ELEVATE_PROGRAM)]
    elevate: String,

    /// Search path used to detect the package manager (defaults to PATH)
    #[arg(long, env = constants::env::OFFDROID_PATH)]
    path: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv_init();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let code = run(&args).await?;

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Detect, confirm, update and report. Returns the process exit code.
async fn run(args: &Args) -> Result<i32> {
    let text = !args.json;

    if text {
        println!("{}", reporter::banner());
        println!("🤖 Detecting operating system and package manager...");
    }

    let detection = match &args.path {
        Some(path) => detector::detect_in(path),
        None => detector::detect(),
    };

    let Some(pm) = detection.manager else {
        let err = UpdateError::NoManagerDetected;
        if args.json {
            println!("{}", reporter::render_detection_json(&detection)?);
        } else {
            println!("❌ {}.", err);
        }
        return Ok(err.exit_code());
    };

    if text {
        println!("🖥️  {} detected on {}", pm.display_name(), detection.os);
    }

    let executor = LocalExecutor::new(text && !args.quiet);
    let updater = Updater::new(executor, Some(args.elevate.clone()));

    if args.dry_run {
        let elevate = match updater.elevation_for(pm) {
            Ok(elevate) => elevate,
            Err(e) => {
                eprintln!("❌ {}", e);
                return Ok(e.exit_code());
            }
        };
        let commands = plan(pm, elevate.as_deref());
        if args.json {
            println!("{}", reporter::render_plan_json(pm, &commands)?);
        } else {
            println!("DRY-RUN MODE - No changes will be made\n");
            for command in &commands {
                println!("  {}", command);
            }
        }
        return Ok(0);
    }

    if !args.yes {
        // stdout carries only the JSON document in --json mode
        let stdin = io::stdin();
        let mut prompt: Box<dyn Write> = if args.json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        let question = "Do you want to search for and install updates? (yes/no): ";
        if !confirm(&mut stdin.lock(), &mut prompt, question)? {
            writeln!(prompt, "Aborted by user.")?;
            return Ok(0);
        }
    }

    if text {
        println!("{}", reporter::start_message(pm));
    }

    let outcome = match updater.run_update(pm).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(e.exit_code());
        }
    };

    if args.json {
        println!("{}", reporter::render_json(&outcome)?);
    } else {
        println!("\n{}", reporter::render(&outcome));
    }

    notify(&outcome).await;

    Ok(outcome.error().map_or(0, |e| e.exit_code()))
}

/// Ask a yes/no question; only "y" or "yes" (any case) counts as yes
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Push the report to Gotify when it is configured
async fn notify(outcome: &UpdateOutcome) {
    let config = match GotifyConfig::from_env() {
        Ok(Some(config)) => config,
        Ok(None) => {
            debug!("GOTIFY_KEY not set; skipping Gotify notification.");
            return;
        }
        Err(e) => {
            warn!("Gotify configuration error: {}", e);
            return;
        }
    };

    let client = http_client();
    let title = reporter::summary(outcome);
    let body = reporter::render(outcome);
    if let Err(e) = send_gotify(&client, &config, &title, &body).await {
        warn!("Gotify send error: {}", e);
    }
}
