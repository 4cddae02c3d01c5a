//! Host-facing shooter component
//!
//! Wraps the pure `sim` functions with phase control, the host's outcome
//! callbacks, and an owned random source. Timers live in `session`.

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::SimError;
use crate::sim::{self, PcgSource, Phase, Snapshot, SpawnRng, Viewport, World};
use crate::tuning::Tuning;

/// Construction options beyond the level
#[derive(Debug, Clone)]
pub struct SimOptions {
    pub width: f32,
    pub height: f32,
    /// Seed for the default PCG source
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0x5EED,
            tuning: Tuning::default(),
        }
    }
}

/// One game session of the shooter mini-game
pub struct ShooterSimulation<R = PcgSource> {
    world: World,
    tuning: Tuning,
    rng: R,
    on_complete: Box<dyn FnMut(bool)>,
    on_exit: Box<dyn FnMut()>,
}

impl ShooterSimulation<PcgSource> {
    /// New session at `level` on the default viewport
    pub fn new(
        level: u32,
        on_complete: impl FnMut(bool) + 'static,
        on_exit: impl FnMut() + 'static,
    ) -> Result<Self, SimError> {
        Self::with_options(level, SimOptions::default(), on_complete, on_exit)
    }

    pub fn with_options(
        level: u32,
        options: SimOptions,
        on_complete: impl FnMut(bool) + 'static,
        on_exit: impl FnMut() + 'static,
    ) -> Result<Self, SimError> {
        let rng = PcgSource::new(options.seed);
        Self::with_rng(level, options, rng, on_complete, on_exit)
    }
}

impl<R: SpawnRng> ShooterSimulation<R> {
    /// New session with a caller-supplied random source
    pub fn with_rng(
        level: u32,
        options: SimOptions,
        mut rng: R,
        on_complete: impl FnMut(bool) + 'static,
        on_exit: impl FnMut() + 'static,
    ) -> Result<Self, SimError> {
        if level == 0 {
            return Err(SimError::InvalidLevel { level });
        }
        options.tuning.validate()?;
        let viewport = Viewport::new(options.width, options.height, &options.tuning)?;

        let mut world = World::new(level, viewport);
        sim::scatter_stars(&mut world, &options.tuning, &mut rng);

        log::info!(
            "Shooter level {level} ready: target {} on {}x{}",
            world.target_score,
            viewport.width,
            viewport.height
        );

        Ok(Self {
            world,
            tuning: options.tuning,
            rng,
            on_complete: Box::new(on_complete),
            on_exit: Box::new(on_exit),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> Phase {
        self.world.phase
    }

    pub fn level(&self) -> u32 {
        self.world.level
    }

    pub fn target_score(&self) -> u32 {
        self.world.target_score
    }

    /// Fraction of the target reached, for the HUD bar
    pub fn progress(&self) -> f32 {
        self.world.progress()
    }

    /// Spawner period for this session's level
    pub fn spawn_interval_ms(&self) -> u64 {
        sim::spawn_interval_ms(self.world.level, &self.tuning)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot()
    }

    /// Track the drag position. Clamped into the play band; accepted in every
    /// phase so a resume picks up wherever the finger is.
    pub fn set_player_position(&mut self, y: f32) {
        if y.is_nan() {
            log::debug!("Ignoring NaN player position");
            return;
        }
        self.world.player_y = self.world.viewport.clamp_y(y);
    }

    /// Fire one bullet (no-op unless running)
    pub fn fire(&mut self) {
        sim::fire(&mut self.world, &self.tuning);
    }

    /// Spawn one enemy (no-op unless running)
    pub fn spawn_tick(&mut self) {
        sim::spawn_enemy(&mut self.world, &self.tuning, &mut self.rng);
    }

    /// Advance one 60 Hz step (no-op unless running)
    pub fn tick(&mut self) -> &World {
        sim::tick(&mut self.world, &self.tuning, &mut self.rng);
        &self.world
    }

    pub fn pause(&mut self) {
        if self.world.phase == Phase::Running {
            self.world.phase = Phase::Paused;
            log::info!("Paused at score {}", self.world.score);
        }
    }

    pub fn resume(&mut self) {
        if self.world.phase == Phase::Paused {
            self.world.phase = Phase::Running;
            log::info!("Resumed");
        }
    }

    /// Start over after a loss. Level and target are kept.
    pub fn retry(&mut self) -> Result<(), SimError> {
        if self.world.phase != Phase::Lost {
            return Err(SimError::IllegalTransition {
                action: "retry",
                phase: self.world.phase,
            });
        }
        self.world.reset_round();
        log::info!("Retrying level {}", self.world.level);
        Ok(())
    }

    /// Host "Continue" after a terminal phase: reports the outcome through
    /// `on_complete` and returns whether the level was won.
    pub fn complete(&mut self) -> Result<bool, SimError> {
        if !self.world.phase.is_terminal() {
            return Err(SimError::IllegalTransition {
                action: "complete",
                phase: self.world.phase,
            });
        }
        let won = self.world.phase == Phase::Won;
        (self.on_complete)(won);
        Ok(won)
    }

    /// Leave the game from any phase
    pub fn exit(mut self) {
        log::info!(
            "Exiting level {} in {:?} at score {}",
            self.world.level,
            self.world.phase,
            self.world.score
        );
        (self.on_exit)();
    }

    /// Adopt a new viewport. Bullets and enemies stay where they are; the
    /// player is re-clamped and the starfield rescattered.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let viewport = Viewport::new(width, height, &self.tuning)?;
        self.world.viewport = viewport;
        self.world.player_y = viewport.clamp_y(self.world.player_y);
        sim::scatter_stars(&mut self.world, &self.tuning, &mut self.rng);
        log::info!("Viewport resized to {width}x{height} (scale {:.2})", viewport.scale);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl<R> std::fmt::Debug for ShooterSimulation<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShooterSimulation")
            .field("world", &self.world)
            .field("tuning", &self.tuning)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::consts::{KILL_SCORE, MAX_HEALTH};
    use crate::sim::{Bullet, Enemy, SequenceRng};

    fn quiet(level: u32) -> ShooterSimulation<SequenceRng> {
        ShooterSimulation::with_rng(
            level,
            SimOptions::default(),
            SequenceRng::constant(0.5),
            |_| {},
            || {},
        )
        .unwrap()
    }

    /// Put an enemy right where the next bullet will be after one tick
    fn line_up_kill(sim: &mut ShooterSimulation<SequenceRng>) {
        let y = 150.0;
        let world = sim.world_mut();
        let id = world.next_enemy_id();
        world.enemies.push(Enemy {
            id,
            pos: Vec2::new(405.0, y),
            speed: 5.0,
            size: 30.0,
        });
        let id = world.next_bullet_id();
        world.bullets.push(Bullet {
            id,
            pos: Vec2::new(386.0, y),
        });
    }

    #[test]
    fn test_new_initial_state() {
        let sim = ShooterSimulation::new(2, |_| {}, || {}).unwrap();
        let world = sim.world();
        assert_eq!(world.score, 0);
        assert_eq!(world.health, MAX_HEALTH);
        assert_eq!(world.phase, Phase::Running);
        assert_eq!(world.target_score, 200);
        assert_eq!(world.player_y, 200.0);
        assert!(world.bullets.is_empty());
        assert!(world.enemies.is_empty());
        assert_eq!(world.stars.len(), 30);
    }

    #[test]
    fn test_level_zero_rejected() {
        let err = ShooterSimulation::new(0, |_| {}, || {}).unwrap_err();
        assert_eq!(err, SimError::InvalidLevel { level: 0 });
    }

    #[test]
    fn test_bad_viewport_rejected() {
        let options = SimOptions {
            height: 100.0,
            ..Default::default()
        };
        let err = ShooterSimulation::with_options(1, options, |_| {}, || {}).unwrap_err();
        assert!(matches!(err, SimError::InvalidViewport { .. }));
    }

    #[test]
    fn test_player_position_clamped() {
        let mut sim = quiet(1);
        sim.set_player_position(-50.0);
        assert_eq!(sim.world().player_y, 60.0);
        sim.set_player_position(10_000.0);
        assert_eq!(sim.world().player_y, 340.0);
        sim.set_player_position(f32::NAN);
        assert_eq!(sim.world().player_y, 340.0);
    }

    #[test]
    fn test_player_position_tracked_while_paused() {
        let mut sim = quiet(1);
        sim.pause();
        sim.set_player_position(100.0);
        sim.resume();
        sim.fire();
        assert_eq!(sim.world().bullets[0].pos.y, 100.0);
    }

    #[test]
    fn test_pause_blocks_everything() {
        let mut sim = quiet(1);
        sim.fire();
        sim.spawn_tick();
        sim.pause();
        assert_eq!(sim.phase(), Phase::Paused);

        let before = (sim.world().bullets.clone(), sim.world().enemies.clone());
        sim.fire();
        sim.spawn_tick();
        sim.tick();
        assert_eq!(before, (sim.world().bullets.clone(), sim.world().enemies.clone()));

        sim.resume();
        assert_eq!(sim.phase(), Phase::Running);
        sim.tick();
        assert_ne!(before.0, sim.world().bullets);
    }

    #[test]
    fn test_pause_resume_ignored_in_wrong_phase() {
        let mut sim = quiet(1);
        sim.resume();
        assert_eq!(sim.phase(), Phase::Running);
        sim.world_mut().phase = Phase::Won;
        sim.pause();
        assert_eq!(sim.phase(), Phase::Won);
    }

    #[test]
    fn test_single_collision_scores_ten() {
        let mut sim = quiet(1);
        line_up_kill(&mut sim);
        sim.tick();
        assert_eq!(sim.world().score, KILL_SCORE);
        assert!(sim.world().bullets.is_empty());
        assert!(sim.world().enemies.is_empty());
    }

    #[test]
    fn test_win_freezes_world() {
        let mut sim = quiet(1);
        let target = sim.target_score();
        sim.world_mut().score = target - KILL_SCORE;
        sim.world_mut().health = 1;
        line_up_kill(&mut sim);
        sim.fire();
        sim.tick();
        assert_eq!(sim.phase(), Phase::Won);

        let frozen = (
            sim.world().score,
            sim.world().bullets.clone(),
            sim.world().enemies.clone(),
        );
        sim.tick();
        sim.fire();
        sim.spawn_tick();
        assert_eq!(
            frozen,
            (
                sim.world().score,
                sim.world().bullets.clone(),
                sim.world().enemies.clone()
            )
        );
        // No retry from a win
        assert!(sim.retry().is_err());
    }

    #[test]
    fn test_loss_and_retry() {
        let mut sim = quiet(3);
        sim.world_mut().health = 1;
        sim.world_mut().score = 40;
        let y = sim.world().player_y;
        sim.world_mut().enemies.push(Enemy {
            id: 99,
            pos: Vec2::new(40.0, y),
            speed: 1.0,
            size: 30.0,
        });
        sim.fire();
        sim.tick();
        assert_eq!(sim.phase(), Phase::Lost);
        assert_eq!(sim.world().health, 0);

        sim.retry().unwrap();
        let world = sim.world();
        assert_eq!(world.score, 0);
        assert_eq!(world.health, MAX_HEALTH);
        assert_eq!(world.phase, Phase::Running);
        assert!(world.bullets.is_empty());
        assert!(world.enemies.is_empty());
        assert_eq!(world.level, 3);
        assert_eq!(world.target_score, 300);
    }

    #[test]
    fn test_retry_only_from_lost() {
        let mut sim = quiet(1);
        assert_eq!(
            sim.retry(),
            Err(SimError::IllegalTransition {
                action: "retry",
                phase: Phase::Running
            })
        );
    }

    #[test]
    fn test_complete_reports_outcome() {
        let outcome = Rc::new(Cell::new(None));
        let seen = outcome.clone();
        let mut sim = ShooterSimulation::with_rng(
            1,
            SimOptions::default(),
            SequenceRng::constant(0.5),
            move |won| seen.set(Some(won)),
            || {},
        )
        .unwrap();

        assert!(sim.complete().is_err());
        assert_eq!(outcome.get(), None);

        sim.world_mut().phase = Phase::Won;
        assert_eq!(sim.complete(), Ok(true));
        assert_eq!(outcome.get(), Some(true));

        sim.world_mut().phase = Phase::Lost;
        assert_eq!(sim.complete(), Ok(false));
        assert_eq!(outcome.get(), Some(false));
    }

    #[test]
    fn test_exit_calls_back() {
        let exits = Rc::new(Cell::new(0));
        let count = exits.clone();
        let mut sim = ShooterSimulation::new(1, |_| {}, move || count.set(count.get() + 1)).unwrap();
        sim.pause();
        sim.exit();
        assert_eq!(exits.get(), 1);
    }

    #[test]
    fn test_resize_keeps_entities() {
        let mut sim = quiet(1);
        sim.set_player_position(340.0);
        sim.fire();
        sim.spawn_tick();
        let bullets = sim.world().bullets.clone();
        let enemies = sim.world().enemies.clone();

        sim.resize(1600.0, 300.0).unwrap();
        assert_eq!(sim.world().bullets, bullets);
        assert_eq!(sim.world().enemies, enemies);
        assert_eq!(sim.world().player_y, 240.0);
        assert_eq!(sim.world().viewport.scale, 0.75);
        assert!(sim.resize(800.0, 50.0).is_err());
        assert_eq!(sim.world().viewport.height, 300.0);
    }

    #[test]
    fn test_ten_kills_win_level_one() {
        let mut sim = quiet(1);
        for _ in 0..10 {
            assert_eq!(sim.phase(), Phase::Running);
            line_up_kill(&mut sim);
            sim.tick();
        }
        let world = sim.world();
        assert_eq!(world.score, 100);
        assert_eq!(world.phase, Phase::Won);
        assert_eq!(world.health, MAX_HEALTH);
    }

    #[test]
    fn test_ids_unique_across_retry() {
        let mut sim = quiet(1);
        sim.fire();
        sim.spawn_tick();
        let first_bullet = sim.world().bullets[0].id;
        let first_enemy = sim.world().enemies[0].id;

        sim.world_mut().phase = Phase::Lost;
        sim.retry().unwrap();
        sim.fire();
        sim.spawn_tick();
        assert_ne!(sim.world().bullets[0].id, first_bullet);
        assert_ne!(sim.world().enemies[0].id, first_enemy);
    }

    #[test]
    fn test_debug_is_printable() {
        assert!(format!("{:?}", quiet(1)).starts_with("ShooterSimulation"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Move(f32),
        Fire,
        Spawn,
        Tick,
        Pause,
        Resume,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-100.0f32..500.0).prop_map(Op::Move),
            Just(Op::Fire),
            Just(Op::Spawn),
            Just(Op::Tick),
            Just(Op::Tick),
            Just(Op::Tick),
            Just(Op::Pause),
            Just(Op::Resume),
        ]
    }

    proptest! {
        #[test]
        fn prop_health_and_score_invariants(seed in any::<u64>(), level in 1u32..6, ops in prop::collection::vec(op(), 0..400)) {
            let options = SimOptions { seed, ..Default::default() };
            let mut sim = ShooterSimulation::with_options(level, options, |_| {}, || {}).unwrap();
            let mut last_score = 0;

            for op in ops {
                let before = sim.world().clone();
                match op {
                    Op::Move(y) => sim.set_player_position(y),
                    Op::Fire => sim.fire(),
                    Op::Spawn => sim.spawn_tick(),
                    Op::Tick => { sim.tick(); }
                    Op::Pause => sim.pause(),
                    Op::Resume => sim.resume(),
                }
                let world = sim.world();

                prop_assert!(world.health <= MAX_HEALTH);
                prop_assert!(world.score >= last_score);
                last_score = world.score;
                prop_assert!(world.player_y >= world.viewport.min_y);
                prop_assert!(world.player_y <= world.viewport.max_y);

                if before.phase != Phase::Running && matches!(op, Op::Fire | Op::Spawn | Op::Tick) {
                    prop_assert_eq!(before.score, world.score);
                    prop_assert_eq!(before.health, world.health);
                    prop_assert_eq!(&before.bullets, &world.bullets);
                    prop_assert_eq!(&before.enemies, &world.enemies);
                }
                if world.phase == Phase::Lost {
                    prop_assert_eq!(world.health, 0);
                    prop_assert!(world.score < world.target_score);
                }
                if world.phase == Phase::Won {
                    prop_assert!(world.health > 0);
                    prop_assert!(world.score >= world.target_score);
                }
            }
        }
    }
}
