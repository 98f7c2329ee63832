//! Headless shape-match host (default binary).
//!
//! Reads protocol lines on stdin, writes effects on stdout, logs to stderr.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shape_match::core::{Progress, Session, SessionEvent, ThemeCatalog};
use shape_match::host::protocol::HostCommand;
use shape_match::host::{Driver, HostConfig, LinePoll, LineReader, PrefSink};
use shape_match::persist::{load_catalog, JsonPrefs};

const MAX_PENDING_LINES: usize = 64;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHAPE_MATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_themes(config: &HostConfig) -> ThemeCatalog {
    let Some(path) = &config.themes_path else {
        return ThemeCatalog::builtin();
    };
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "using built-in theme");
            ThemeCatalog::builtin()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = HostConfig::from_env();
    info!(?config, "starting");

    let catalog = load_themes(&config);
    let prefs = JsonPrefs::open(&config.prefs_path)?;
    let progress = Progress::load(&prefs);
    info!(
        path = %prefs.path().display(),
        unlocked_level = progress.unlocked_level(),
        "prefs loaded"
    );
    let session = Session::new(Arc::new(catalog), progress, config.session_config());
    let mut driver = Driver::new(session, prefs);
    let mut input = LineReader::start_stdin(MAX_PENDING_LINES)?;

    run(&mut driver, &mut input, config.tick_ms)
}

fn run<P: PrefSink>(driver: &mut Driver<P>, input: &mut LineReader, tick_ms: u32) -> Result<()> {
    let stdout = io::stdout();
    let mut out = Vec::with_capacity(64);

    driver.handle_command(HostCommand::Event(SessionEvent::Booted), &mut out)?;

    let tick_duration = Duration::from_millis(tick_ms as u64);
    let mut last_tick = Instant::now();

    loop {
        // Drain whatever input arrived since the last frame.
        loop {
            match input.poll() {
                LinePoll::Line(line) => driver.handle_line(&line, &mut out)?,
                LinePoll::Empty => break,
                LinePoll::Closed => {
                    info!("input closed, exiting");
                    return flush_lines(&stdout, &mut out);
                }
            }
            if driver.is_quit() {
                return flush_lines(&stdout, &mut out);
            }
        }

        if last_tick.elapsed() >= tick_duration {
            let elapsed = last_tick.elapsed().as_millis().min(u32::MAX as u128) as u32;
            last_tick = Instant::now();
            driver.tick(elapsed, &mut out)?;
        }

        flush_lines(&stdout, &mut out)?;

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        std::thread::sleep(timeout.min(Duration::from_millis(2)));
    }
}

fn flush_lines(stdout: &io::Stdout, out: &mut Vec<String>) -> Result<()> {
    if out.is_empty() {
        return Ok(());
    }
    let mut lock = stdout.lock();
    for line in out.drain(..) {
        writeln!(lock, "{}", line).context("writing to stdout")?;
    }
    lock.flush().context("flushing stdout")
}
