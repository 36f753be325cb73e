use std::io;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::audio::AudioSink;
use crate::context::AppContext;
use crate::error::AppError;
use crate::game::{GameStateMachine, Snapshot};
use crate::input::{Intent, InputTranslator, RawEvent};

/// Producer of raw device events.
pub trait InputSource {
    /// Returns every event that arrived since the previous call, without blocking.
    fn drain_events(&mut self) -> io::Result<Vec<RawEvent>>;
}

/// Consumer of per-tick snapshots.
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

/// Monotonic time source the loop samples and sleeps on.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RunStats {
    pub ticks: u64,
    /// Ticks whose processing took longer than the tick budget.
    pub overruns: u64,
}

/// Fixed-rate Input → Update → Render loop.
///
/// Slow ticks are never skipped or batched: a tick that overruns its budget
/// is followed immediately by the next one.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    tick_interval: Duration,
}

impl TickScheduler {
    #[must_use]
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Runs ticks until a quit intent arrives. The tick that received the quit
    /// still completes its update and render.
    pub fn run<F, A, C>(
        &self,
        machine: &mut GameStateMachine,
        ctx: &mut AppContext<F, A>,
        clock: &C,
    ) -> Result<RunStats, AppError>
    where
        F: InputSource + RenderSink,
        A: AudioSink,
        C: Clock,
    {
        let translator = InputTranslator::new(ctx.buttons);
        let mut stats = RunStats::default();
        let mut running = true;

        info!(
            "tick loop started at {} ms per tick on a {}x{} board with {} obstacles",
            self.tick_interval.as_millis(),
            ctx.bounds.width,
            ctx.bounds.height,
            ctx.config.obstacle_count
        );

        while running {
            let tick_start = clock.now();

            let mut intents = Vec::new();
            for event in ctx.frontend.drain_events()? {
                match translator.translate(event, machine.phase(), machine.heading()) {
                    Some(Intent::Quit) => running = false,
                    Some(intent) => intents.push(intent),
                    None => {}
                }
            }

            machine.update(&mut ctx.audio, &intents, tick_start);
            ctx.frontend
                .render(&machine.snapshot(ctx.audio.volume()))?;
            stats.ticks += 1;

            let elapsed = clock.now().saturating_duration_since(tick_start);
            match self.tick_interval.checked_sub(elapsed) {
                Some(remaining) if !remaining.is_zero() => clock.sleep(remaining),
                _ => {
                    stats.overruns += 1;
                    debug!(
                        "tick {} overran its budget: {} ms",
                        stats.ticks,
                        elapsed.as_millis()
                    );
                }
            }
        }

        info!(
            "tick loop stopped after {} ticks ({} overruns)",
            stats.ticks, stats.overruns
        );
        Ok(stats)
    }
}
