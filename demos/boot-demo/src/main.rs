//! IRREVERSO OS boot demo
//!
//! Plays the boot sequence in a terminal:
//! - the neural mesh painted with half-block cells
//! - title, narrative and the deploy log over it
//! - the temporal-access screen, then the core surface
//!
//! Press Enter during the boot to skip it.

mod ui;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tokio::sync::{mpsc, oneshot};

use irreverso_core::{Language, Seed};
use irreverso_runtime::{init_tracing, BootConfig, BootDriver, BootOutcome, BootSequencer, BootSignal, LogFormat};
use irreverso_shell::{
    canon, entity_caption, locale, menu, page, timeline, AccessScreen, AccessSignal, AppState, JsonFileStore, Labels,
    Landing, Route, Shell, Telemetry, VisitGate, Zone, COUNTDOWN_TICK,
};
use irreverso_time::{Clock, SequenceClock};
use irreverso_visual::{GraphicsBackend, SoftwareBackend, UnavailableBackend};

use ui::{BootPainter, Screen};

#[derive(Parser, Debug)]
#[command(name = "irreverso-boot", about = "Play the IRREVERSO OS boot sequence in the terminal")]
struct Args {
    /// Total boot length, e.g. `15s` or `9500ms`
    #[arg(long, value_parser = humantime::parse_duration)]
    duration: Option<Duration>,

    /// Pin the seed label for a reproducible run
    #[arg(long)]
    seed: Option<String>,

    /// Display language (pt, en, es); taken from the locale when unset
    #[arg(long)]
    lang: Option<Language>,

    /// JSON boot configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output on stderr: pretty or json
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Where the last-visit timestamp is kept
    #[arg(long, default_value = ".irreverso/state.json")]
    state_file: PathBuf,

    /// Play the boot even after a recent visit
    #[arg(long)]
    force_boot: bool,

    /// Keep the text surface only
    #[arg(long)]
    no_shader: bool,

    /// Timeline year the core surface opens on
    #[arg(long)]
    year: Option<i32>,

    /// Canonical search to answer on the core surface
    #[arg(long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.log_format)?;

    let mut config = match &args.config {
        Some(path) => BootConfig::from_json_file(path)?,
        None => BootConfig::default(),
    };
    if let Some(duration) = args.duration {
        config = config.with_duration(duration);
    }
    if let Some(label) = &args.seed {
        config = config.with_seed(Seed::from_label(label.clone()));
    }
    let language = args.lang.or(config.language).unwrap_or_else(locale::detect);
    config = config.with_language(language);
    config.validate()?;

    let gate = VisitGate::new(JsonFileStore::new(&args.state_file));
    let landing = if args.force_boot {
        Landing::Boot
    } else {
        gate.decide(irreverso_shell::now_millis())
    };
    tracing::info!(?landing, state_file = %args.state_file.display(), "visit gate decided");

    let year = timeline::nearest_year(args.year.unwrap_or(timeline::PRESENT_YEAR));
    let zone = Zone::detect();

    {
        let _screen = Screen::enter()?;
        if landing == Landing::Boot {
            match play_boot(config, args.no_shader).await? {
                BootOutcome::Finished | BootOutcome::Unmounted => {
                    gate.complete(irreverso_shell::now_millis())?;
                }
                BootOutcome::HostGone => return Ok(()),
            }
        }
        temporal_access(language, year, zone.clone()).await?;
    }

    print_core(language, year, &zone, args.query.as_deref())?;
    Ok(())
}

async fn play_boot(config: BootConfig, no_shader: bool) -> Result<BootOutcome, Box<dyn std::error::Error>> {
    let (cols, rows) = ui::cells();
    let viewport = ui::viewport_for(cols, rows);
    let backend: Box<dyn GraphicsBackend> = if no_shader {
        Box::new(UnavailableBackend::new("shader disabled from the command line"))
    } else {
        Box::new(SoftwareBackend::new())
    };

    let driver = BootDriver::new(config.frame_interval);
    let sequencer = BootSequencer::mount(
        config,
        backend.as_ref(),
        &viewport,
        Box::new(|| tracing::info!("boot sequence complete")),
    );
    tracing::info!(seed = %sequencer.seed().label(), finish_at = ?sequencer.finish_at(), "boot mounted");
    if let Some(err) = sequencer.renderer().degraded() {
        tracing::warn!(error = %err, "booting over the static background");
    }

    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
    let (unmount_tx, unmount_rx) = oneshot::channel();
    let (skip_tx, mut skip_rx) = mpsc::channel::<()>(1);

    // Enter on stdin skips the boot
    std::thread::spawn(move || {
        let mut line = String::new();
        if matches!(io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            let _ = skip_tx.blocking_send(());
        }
    });

    let mut painter = BootPainter::new(viewport.clone());
    let task = tokio::spawn(async move {
        driver
            .run_observed(sequencer, signal_tx, unmount_rx, move |seq| {
                if let Err(e) = painter.paint(seq) {
                    tracing::warn!(error = %e, "paint failed");
                }
            })
            .await
    });

    let mut unmount_tx = Some(unmount_tx);
    loop {
        tokio::select! {
            signal = signal_rx.recv() => match signal {
                Some(BootSignal::PhaseChanged(phase)) => tracing::info!(%phase, "phase"),
                Some(BootSignal::Glitch(on)) => tracing::debug!(on, "glitch"),
                Some(BootSignal::LogExhausted) => tracing::debug!("deploy log exhausted"),
                Some(other) => tracing::trace!(?other, "boot signal"),
                None => break,
            },
            Some(()) = skip_rx.recv(), if unmount_tx.is_some() => {
                if let Some(tx) = unmount_tx.take() {
                    tracing::info!("boot skipped");
                    let _ = tx.send(());
                }
            }
        }
    }

    let outcome = task.await?;
    tracing::info!(?outcome, "boot ended");
    Ok(outcome)
}

async fn temporal_access(language: Language, year: i32, zone: Zone) -> io::Result<()> {
    let mut out = io::stdout();
    let clock = SequenceClock::start();
    let mut screen = AccessScreen::open(language, year, zone, clock.now());
    let mut ticker = tokio::time::interval(COUNTDOWN_TICK);

    ui::paint_access(&mut out, &screen)?;
    loop {
        ticker.tick().await;
        let signals = screen.advance_to(clock.now());
        if signals.is_empty() {
            continue;
        }
        ui::paint_access(&mut out, &screen)?;
        if let Some(AccessSignal::Redirect(route)) = signals.last() {
            tracing::info!(%route, "temporal access redirect");
            return Ok(());
        }
    }
}

fn print_core(language: Language, year: i32, zone: &Zone, query: Option<&str>) -> io::Result<()> {
    let labels = Labels::for_language(language);
    let mut shell = Shell::new(AppState::default());
    shell.pick_year(year);

    let today = Utc::now().date_naive();
    let telemetry = Telemetry::generate(today, zone, &mut rand::thread_rng());
    let (entity, caption) = entity_caption(language, shell.state().year);

    let mut out = io::stdout().lock();
    writeln!(out, "{} • {}", labels.core_title, labels.subtitle)?;
    writeln!(out, "{}", telemetry.rail_line(labels, shell.state().year))?;
    writeln!(out)?;
    writeln!(out, "{entity}")?;
    writeln!(out, "{caption}")?;
    writeln!(out)?;

    let pills: Vec<String> = telemetry
        .status_pills(shell.state().year)
        .iter()
        .map(|(key, value)| format!("[{key} {value}]"))
        .collect();
    writeln!(out, "{}", pills.join(" "))?;
    writeln!(out, "{}", timeline::title(labels.timeline))?;
    let bar: Vec<String> = timeline::YEARS
        .iter()
        .map(|y| if *y == shell.state().year { format!("[{y}]") } else { y.to_string() })
        .collect();
    writeln!(out, "  {}", bar.join(" · "))?;
    writeln!(out)?;

    writeln!(out, "{}", labels.menu)?;
    for item in menu::items(language) {
        writeln!(out, "  {:<14} {:<24} {}", item.label, item.meta, item.href())?;
    }

    if let Some(query) = query {
        writeln!(out)?;
        writeln!(out, "{} > {query}", labels.canon_search)?;
        let answer = canon::search(query, language);
        if answer.is_empty() {
            writeln!(out, "  {}", canon::PLACEHOLDER)?;
        }
        for entry in answer {
            writeln!(out, "  {}", entry.line())?;
        }
    }

    if let Some(summary) = page(Route::Summary, language) {
        writeln!(out)?;
        writeln!(out, "{} // {}", summary.heading.to_uppercase(), summary.body)?;
        writeln!(out, "  {}", summary.note)?;
    }

    tracing::debug!(build = %telemetry.build, "core surface printed");
    out.flush()
}
