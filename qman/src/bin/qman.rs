//! Operator console for the Andor CCD observation queue.
//!
//! Loads the queue file and the optional fixed-object catalog, starts the
//! position publisher, and drives queue lifecycle commands from a
//! line-oriented console. Refuses to start when another instance holds the
//! lock.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use objinfo::{Catalog, CatalogResolver, Site};
use qman::instance::DEFAULT_LOCK_PATH;
use qman::publisher::{status_file_path, ActiveTarget, PositionPublisher};
use qman::render::{LogRenderer, RenderPool};
use qman::status::StatusCallback;
use qman::{QueueStore, Session, SingleInstance};

#[derive(Parser, Debug)]
#[command(name = "qman")]
#[command(about = "Queue manager for the Andor CCD")]
struct Args {
    /// CCDOBS queue list file
    ccdobs: PathBuf,

    /// Fixed-object position file
    #[arg(long, short = 'o')]
    objpos: Option<PathBuf>,

    /// Observatory latitude in degrees, north positive
    #[arg(long, default_value_t = 0.0)]
    site_lat: f64,

    /// Observatory longitude in degrees, east positive
    #[arg(long, default_value_t = 0.0)]
    site_lon: f64,

    /// Position publish period in milliseconds
    #[arg(long, default_value_t = 1000)]
    period_ms: u64,

    /// Debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_catalog(path: Option<&PathBuf>) -> Catalog {
    let Some(path) = path else {
        warn!("Warning: No objpos file found!");
        return Catalog::empty();
    };
    match Catalog::load_from_file(path) {
        Ok(catalog) => {
            info!("objpos catalog: {} entries", catalog.len());
            catalog
        }
        Err(e) => {
            warn!("Warning: No objpos file found! ({e})");
            Catalog::empty()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let _lock = SingleInstance::acquire(DEFAULT_LOCK_PATH)
        .context("failed to acquire the instance lock")?;

    info!("QMAN started!");
    info!("CCDOBS file: {}", args.ccdobs.display());

    let catalog = load_catalog(args.objpos.as_ref());
    let site = Site {
        latitude_deg: args.site_lat,
        longitude_deg: args.site_lon,
    };
    let resolver = Arc::new(CatalogResolver::new(catalog, site));

    let (store, rejected) = QueueStore::open(&args.ccdobs);
    for reject in &rejected {
        warn!(
            "skipping queue file line {}: {} ({})",
            reject.line, reject.content, reject.reason
        );
    }

    let target: ActiveTarget = Arc::new(Mutex::new(None));
    let status: StatusCallback = Arc::new(|line: &str| println!("{line}"));

    let publisher = PositionPublisher::new(
        resolver.clone(),
        target.clone(),
        status_file_path(),
        Duration::from_millis(args.period_ms),
        status.clone(),
    )
    .spawn();

    let charts = RenderPool::new(Arc::new(LogRenderer), 2, 8);
    let mut session = Session::new(store, resolver, target, charts, status.clone());

    // Select the first object at startup, as the UI does
    if let Some(first) = session.first_object() {
        if let Err(e) = session.select(&first) {
            warn!("startup selection failed: {e}");
        }
    }
    status(&qman::status::stamp("Ready!"));
    info!("Ready!");

    run_console(&mut session)?;

    publisher.stop();
    session.shutdown();
    Ok(())
}

/// The single-threaded control loop: every store mutation happens here.
fn run_console(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("qman> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = dispatch(session, command, rest);
        match result {
            Ok(ConsoleOutcome::Continue) => {}
            Ok(ConsoleOutcome::Quit) => break,
            Err(e) => println!("{}", qman::status::stamp(&format!("Error: {e}"))),
        }
    }
    Ok(())
}

enum ConsoleOutcome {
    Continue,
    Quit,
}

fn dispatch(session: &mut Session, command: &str, rest: &str) -> Result<ConsoleOutcome> {
    match command {
        "list" => {
            for name in session.list_names() {
                println!("{name}");
            }
        }
        "find" => {
            for name in session.filter_names(rest) {
                println!("{name}");
            }
        }
        "select" => {
            let position = session.select(rest)?;
            if position.found {
                if let (Some(ra), Some(dec)) =
                    (position.ra_sexagesimal(), position.dec_sexagesimal())
                {
                    let label = position
                        .equatorial
                        .map(|eq| eq.epoch_label())
                        .unwrap_or_default();
                    println!("RA  {ra} ({label})");
                    println!("DEC {dec} ({label})");
                }
            } else {
                println!("{} not resolved", position.name);
            }
        }
        "show" => {
            for row in session.rows() {
                println!(
                    "{:>3}  {:<7}{:<11}{:<7.1}{}",
                    row.number, row.image_type, row.filter, row.exposure, row.readout
                );
            }
            println!("queue time: {:.1} s", session.queue_time());
        }
        "set" => session.set_queue()?,
        "add" => session.add_queue(rest)?,
        "addrow" => session.add_row(),
        "remove" => session.remove_queue(rest)?,
        "rename" => {
            let (old, new) = rest
                .split_once(char::is_whitespace)
                .context("usage: rename <old> <new>")?;
            session.rename_queue(old.trim(), new.trim())?;
        }
        "quit" | "exit" => return Ok(ConsoleOutcome::Quit),
        other => println!("unknown command: {other}"),
    }
    Ok(ConsoleOutcome::Continue)
}
