//! TUI application for the map shell.
//!
//! - `run_tui()` - Interactive shell: start screen, then the live map
//! - `run_headless()` - Position log for non-TTY environments
//! - `ShellConfig` - Configuration struct for shell startup
//!
//! The start command acts as a thin front controller that resolves
//! configuration and builds the backend, then delegates here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use waymark::coord::{CoordSpan, MapRegion};
use waymark::location::{LocationBackend, SystemLocationSource};
use waymark::map::{MapBinder, MapDisplay};

use crate::error::CliError;
use crate::ui::{MapView, Shell, ShellEvent, ViewportDisplay};

/// Delay between pressing Start and showing the map.
const START_TRANSITION_DELAY: Duration = Duration::from_secs(2);

/// How long the find-nearby spinner runs before giving up.
const FIND_NEARBY_DURATION: Duration = Duration::from_secs(2);

/// How long the "no places found" note stays on screen.
const NEARBY_NOTE_TTL: Duration = Duration::from_secs(5);

/// Render tick rate.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Configuration for starting the shell.
pub struct ShellConfig {
    /// Location backend the map follows.
    pub backend: Box<dyn LocationBackend>,
    /// Span of the displayed region.
    pub span: CoordSpan,
    /// Whether region changes animate.
    pub animate: bool,
    /// Shutdown flag set by the signal handler.
    pub shutdown: Arc<AtomicBool>,
}

type ShellBinder = MapBinder<SystemLocationSource<Box<dyn LocationBackend>>, ViewportDisplay>;

/// Screen the shell is currently showing.
enum Screen {
    /// Start screen. The backend waits here untouched until the user
    /// activates it and the countdown elapses.
    Start {
        backend: Box<dyn LocationBackend>,
        activated_at: Option<Instant>,
    },
    /// Live map bound to the location pipeline.
    Map {
        binder: ShellBinder,
        searching_since: Option<Instant>,
        search_done_at: Option<Instant>,
    },
}

/// Run the interactive shell until the user quits or a signal arrives.
pub fn run_tui(config: ShellConfig) -> Result<(), CliError> {
    let ShellConfig {
        backend,
        span,
        animate,
        shutdown,
    } = config;

    let mut shell = Shell::new()?;
    let mut screen = Screen::Start {
        backend,
        activated_at: None,
    };
    let mut last_tick = Instant::now() - TICK_RATE;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        match shell.poll_event()? {
            Some(ShellEvent::Quit) => break,
            Some(ShellEvent::Activate) => {
                if let Screen::Start { activated_at, .. } = &mut screen {
                    if activated_at.is_none() {
                        *activated_at = Some(Instant::now());
                        tracing::info!("start pressed");
                    }
                }
            }
            Some(ShellEvent::FindNearby) => {
                if let Screen::Map {
                    searching_since, ..
                } = &mut screen
                {
                    if searching_since.is_none() {
                        *searching_since = Some(Instant::now());
                        tracing::info!("nearby places search requested");
                    }
                }
            }
            None => {}
        }

        screen = advance_screen(screen, span, animate);

        match &mut screen {
            Screen::Start {
                backend,
                activated_at,
            } => {
                if last_tick.elapsed() >= TICK_RATE {
                    shell.draw_start(backend.name(), activated_at.is_some())?;
                    last_tick = Instant::now();
                }
            }
            Screen::Map {
                binder,
                searching_since,
                search_done_at,
            } => {
                binder.pump();

                if let Some(since) = *searching_since {
                    if since.elapsed() >= FIND_NEARBY_DURATION {
                        *searching_since = None;
                        *search_done_at = Some(Instant::now());
                        tracing::info!("nearby places search finished");
                    }
                }

                if last_tick.elapsed() >= TICK_RATE {
                    binder.display_mut().advance_animation();

                    let view = MapView {
                        region: binder.display().region(),
                        marker: binder.last_applied(),
                        shows_user_location: binder.display().shows_user_location(),
                        backend_name: binder.source().backend().name(),
                        regions_applied: binder.regions_applied(),
                        updates_suppressed: binder.updates_suppressed(),
                        searching: searching_since.is_some(),
                        search_exhausted: search_done_at
                            .map(|at| at.elapsed() < NEARBY_NOTE_TTL)
                            .unwrap_or(false),
                    };
                    shell.draw_map(&view)?;
                    last_tick = Instant::now();
                }
            }
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    Ok(())
}

/// Move from the start screen to the map once the countdown elapses.
fn advance_screen(screen: Screen, span: CoordSpan, animate: bool) -> Screen {
    match screen {
        Screen::Start {
            backend,
            activated_at: Some(activated_at),
        } if activated_at.elapsed() >= START_TRANSITION_DELAY => {
            tracing::info!(backend = backend.name(), "start complete, binding map");
            let source = SystemLocationSource::new(backend);
            let binder = MapBinder::new(source, ViewportDisplay::new())
                .with_span(span)
                .with_animation(animate);
            Screen::Map {
                binder,
                searching_since: None,
                search_done_at: None,
            }
        }
        other => other,
    }
}

/// Display that logs region changes to stdout.
#[derive(Default)]
struct LoggingDisplay {
    announced_fix: bool,
}

impl MapDisplay for LoggingDisplay {
    fn set_region(&mut self, region: MapRegion, _animated: bool) {
        println!("Position: {}", region.center);
    }

    fn set_shows_user_location(&mut self, visible: bool) {
        if visible && !self.announced_fix {
            println!("Position fix acquired.");
            self.announced_fix = true;
        }
    }
}

/// Run without a terminal UI, logging each position to stdout.
pub fn run_headless(config: ShellConfig) -> Result<(), CliError> {
    let ShellConfig {
        backend,
        span,
        animate,
        shutdown,
    } = config;

    println!("Following the '{}' backend. Press Ctrl+C to stop.", backend.name());
    println!();

    let handle = tokio::runtime::Handle::current();
    let source = SystemLocationSource::new(backend);
    let binder = MapBinder::new(source, LoggingDisplay::default())
        .with_span(span)
        .with_animation(animate);

    let cancel = CancellationToken::new();
    let pipeline = handle.spawn(binder.run(cancel.child_token()));

    while !shutdown.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    cancel.cancel();
    // Give the pipeline a moment to observe the cancellation.
    std::thread::sleep(Duration::from_millis(50));
    drop(pipeline);

    println!();
    Ok(())
}
