//! Timer driver for a shooter session
//!
//! Three periodic actions mutate the world: the 60 Hz tick, autofire, and the
//! spawner. The session owns the simulation and runs all of them, plus host
//! commands, on one consumer so nothing races. Time is virtual: the host
//! reports elapsed wall time and the session dispatches whatever fell due,
//! in due-time order.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crate::consts::{MAX_FRAME_US, TICK_PERIOD_US};
use crate::error::SimError;
use crate::ms_to_us;
use crate::sim::{PcgSource, Phase, Snapshot, SpawnRng};
use crate::simulation::ShooterSimulation;

/// Input from the host screen
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Drag position
    MovePlayer(f32),
    /// Manual shot (works alongside or instead of autofire)
    Fire,
    Pause,
    Resume,
    /// Pause button
    TogglePause,
    Retry,
    /// "Continue" on the end screen
    Complete,
    Resize { width: f32, height: f32 },
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Tick,
    Fire,
    Spawn,
}

/// Interval timer measured in virtual microseconds
#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    period_us: u64,
    elapsed_us: u64,
    enabled: bool,
}

impl Timer {
    fn new(kind: TimerKind, period_us: u64, enabled: bool) -> Self {
        Self {
            kind,
            period_us: period_us.max(1),
            elapsed_us: 0,
            enabled,
        }
    }

    fn due_in(&self) -> Option<u64> {
        self.enabled
            .then(|| self.period_us.saturating_sub(self.elapsed_us))
    }
}

/// The three session timers. Array order breaks ties: tick, fire, spawn.
#[derive(Debug, Clone)]
struct Timers {
    timers: [Timer; 3],
}

impl Timers {
    fn new(fire_period_us: u64, autofire: bool, spawn_period_us: u64) -> Self {
        Self {
            timers: [
                Timer::new(TimerKind::Tick, TICK_PERIOD_US, true),
                Timer::new(TimerKind::Fire, fire_period_us, autofire),
                Timer::new(TimerKind::Spawn, spawn_period_us, true),
            ],
        }
    }

    /// Earliest timer to fire and how long until it does
    fn next_due(&self) -> Option<(usize, u64)> {
        let mut best: Option<(usize, u64)> = None;
        for (index, timer) in self.timers.iter().enumerate() {
            if let Some(due) = timer.due_in() {
                if best.is_none_or(|(_, best_due)| due < best_due) {
                    best = Some((index, due));
                }
            }
        }
        best
    }

    fn advance(&mut self, us: u64) {
        for timer in self.timers.iter_mut().filter(|t| t.enabled) {
            timer.elapsed_us = timer.elapsed_us.saturating_add(us);
        }
    }

    /// Fire timer `index`, restarting its period
    fn fire(&mut self, index: usize) -> TimerKind {
        let timer = &mut self.timers[index];
        timer.elapsed_us = 0;
        timer.kind
    }

    /// Stop every pending interval. Restarting begins a full period.
    fn cancel(&mut self) {
        for timer in &mut self.timers {
            timer.elapsed_us = 0;
        }
    }
}

/// A running shooter plus its timers
pub struct Session<R = PcgSource> {
    sim: Option<ShooterSimulation<R>>,
    timers: Timers,
    clock_us: u64,
}

impl<R: SpawnRng> Session<R> {
    pub fn new(sim: ShooterSimulation<R>) -> Self {
        let tuning = sim.tuning();
        let timers = Timers::new(
            ms_to_us(tuning.autofire_interval_ms),
            tuning.autofire,
            ms_to_us(sim.spawn_interval_ms()),
        );
        log::debug!(
            "Session timers: tick {}us, autofire {} every {}ms, spawn every {}ms",
            TICK_PERIOD_US,
            if tuning.autofire { "on" } else { "off" },
            tuning.autofire_interval_ms,
            sim.spawn_interval_ms()
        );
        Self {
            sim: Some(sim),
            timers,
            clock_us: 0,
        }
    }

    /// None once the host exited
    pub fn simulation(&self) -> Option<&ShooterSimulation<R>> {
        self.sim.as_ref()
    }

    pub fn is_exited(&self) -> bool {
        self.sim.is_none()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.sim.as_ref().map(|s| s.phase())
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.sim.as_ref().map(|s| s.snapshot())
    }

    /// Virtual time spent running
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.clock_us)
    }

    /// Apply one host command
    pub fn handle(&mut self, command: HostCommand) -> Result<(), SimError> {
        if command == HostCommand::Exit {
            if let Some(sim) = self.sim.take() {
                self.timers.cancel();
                sim.exit();
            }
            return Ok(());
        }

        let Some(sim) = self.sim.as_mut() else {
            log::debug!("Ignoring {command:?} after exit");
            return Ok(());
        };

        match command {
            HostCommand::MovePlayer(y) => sim.set_player_position(y),
            HostCommand::Fire => sim.fire(),
            HostCommand::Pause => sim.pause(),
            HostCommand::Resume => sim.resume(),
            HostCommand::TogglePause => match sim.phase() {
                Phase::Running => sim.pause(),
                Phase::Paused => sim.resume(),
                _ => {}
            },
            HostCommand::Retry => sim.retry()?,
            HostCommand::Complete => {
                sim.complete()?;
            }
            HostCommand::Resize { width, height } => sim.resize(width, height)?,
            // handled above
            HostCommand::Exit => {}
        }

        if sim.phase() != Phase::Running {
            self.timers.cancel();
        }
        Ok(())
    }

    /// Apply every command waiting on the channel. Rejected commands are
    /// logged and skipped. Returns how many were applied.
    pub fn drain(&mut self, commands: &Receiver<HostCommand>) -> usize {
        let mut applied = 0;
        loop {
            match commands.try_recv() {
                Ok(command) => match self.handle(command) {
                    Ok(()) => applied += 1,
                    Err(err) => log::warn!("Host command rejected: {err}"),
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Advance virtual time, dispatching every timer that falls due.
    ///
    /// Long frames are clamped so a stalled host can't trigger a burst of
    /// catch-up ticks. Returns the number of simulation ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let Some(sim) = self.sim.as_mut() else {
            return 0;
        };
        if sim.phase() != Phase::Running {
            self.timers.cancel();
            return 0;
        }

        let mut budget = u64::try_from(elapsed.as_micros())
            .unwrap_or(u64::MAX)
            .min(MAX_FRAME_US);
        let mut ticks = 0;

        while let Some((index, due)) = self.timers.next_due() {
            if due > budget {
                self.timers.advance(budget);
                self.clock_us += budget;
                break;
            }
            self.timers.advance(due);
            self.clock_us += due;
            budget -= due;

            match self.timers.fire(index) {
                TimerKind::Tick => {
                    sim.tick();
                    ticks += 1;
                }
                TimerKind::Fire => sim.fire(),
                TimerKind::Spawn => sim.spawn_tick(),
            }

            if sim.phase() != Phase::Running {
                self.timers.cancel();
                break;
            }
        }
        ticks
    }
}

impl<R> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("sim", &self.sim)
            .field("clock_us", &self.clock_us)
            .finish_non_exhaustive()
    }
}
