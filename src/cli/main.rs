//! Command line front end.
//!
//! Geocodes place lists, saves and loads shared lists, and runs the quiz
//! against a headless marker layer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use topo::geocoder::Progress;
use topo::persistence::list_id_from_url;
use topo::render::MarkerLayer;
use topo::{Config, Session};

mod print;
mod shell;

#[derive(Parser, Debug)]
#[command(name = "topo")]
#[command(about = "Geocode place lists, share them and quiz yourself on the map")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug log output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Geocode place names, one per line, from a file or stdin
    Find {
        /// Read names from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save the found places under this list name
        #[arg(long)]
        save: Option<String>,
    },
    /// Load a saved list by id or share URL
    Load { list: String },
    /// Play the quiz on a saved list
    Quiz { list: String },
    /// Interactive session
    Shell {
        /// Share URL or list id to open on start
        #[arg(long)]
        open: Option<String>,
    },
}

type CliSession = Session<MarkerLayer, StdRng>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose > 0 { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(args.config.as_deref())?;
    info!("Geocoder backend: {:?}", config.geocoder.backend);

    let mut session = Session::new(&config, MarkerLayer::new(), StdRng::from_os_rng())?;

    match args.command {
        Cmd::Find { file, save } => find(&mut session, file, save).await,
        Cmd::Load { list } => {
            load(&mut session, &list).await?;
            print::places(&session);
            Ok(())
        }
        Cmd::Quiz { list } => {
            load(&mut session, &list).await?;
            quiz(&mut session).await
        }
        Cmd::Shell { open } => {
            if let Some(list) = open {
                if let Err(err) = load(&mut session, &list).await {
                    eprintln!("! {:#}", err);
                }
            }
            shell::run(&mut session).await
        }
    }
}

async fn find(session: &mut CliSession, file: Option<PathBuf>, save: Option<String>) -> Result<()> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            text
        }
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let result = session
        .find(&text, |progress| match progress {
            Progress::Started { total, name, .. } => {
                pb.set_length(total as u64);
                pb.set_message(name.to_string());
            }
            Progress::Resolved { .. } => pb.inc(1),
        })
        .await;
    pb.finish_and_clear();
    result?;

    print::places(session);
    print::status(session.status());

    if let Some(name) = save {
        session.save(&name).await?;
        print::status(session.save_status());
    }
    Ok(())
}

/// Load by share URL or bare id.
async fn load(session: &mut CliSession, list: &str) -> Result<()> {
    let id = list_id_from_url(list, session.list_client().share_param())
        .unwrap_or_else(|| list.trim().to_string());
    session.load(&id).await?;
    print::status(session.status());
    Ok(())
}

async fn quiz<R: Rng>(session: &mut Session<MarkerLayer, R>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let question = session.enter_quiz()?;
    print::outcome(session, &question);

    loop {
        println!("Your answer (1-4, q to stop):");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let choice = match line.parse::<usize>() {
            Ok(n) if (1..=4).contains(&n) => n - 1,
            _ => {
                eprintln!("! expected a number from 1 to 4");
                continue;
            }
        };

        let outcome = session.answer(choice)?;
        print::outcome(session, &outcome);

        let next = session.next_question()?;
        print::outcome(session, &next);
    }

    let stats = session.quiz().stats();
    session.exit_quiz();
    print::stats(&stats);
    Ok(())
}
