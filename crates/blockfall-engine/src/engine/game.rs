use std::time::Duration;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use tracing::debug;

use crate::{ConfigError, core::Direction};

use super::{
    Clock, GameConfig, MonotonicClock, PieceSource, Scheduler, Session, Snapshot, Transition,
};

/// A session wired to a clock-driven gravity scheduler.
///
/// This is the surface a front end talks to: it forwards player commands to
/// the [`Session`], keeps the [`Scheduler`] in step with the session state and
/// turns elapsed time into gravity ticks on [`Game::poll`].
///
/// The scheduler is armed exactly while the session is running. Pausing
/// discards the time elapsed before the pause; resuming starts a full drop
/// interval from the resume instant. A successful manual downward move also
/// restarts the interval.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, Game, ManualClock, PieceKind, PieceSequence};
///
/// let clock = ManualClock::new();
/// let mut game = Game::new(
///     &GameConfig::default(),
///     PieceSequence::new([PieceKind::T]),
///     clock.clone(),
/// )?;
/// game.start();
///
/// clock.advance(Duration::from_millis(501));
/// assert!(game.poll().is_moved());
/// assert_eq!(game.session().falling_piece().unwrap().position().y(), 1);
/// # Ok::<(), blockfall_engine::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct Game<S, C> {
    session: Session<S>,
    scheduler: Scheduler,
    clock: C,
}

impl<S, C> Game<S, C>
where
    S: PieceSource,
    C: Clock,
{
    /// Creates an idle game. Fails if `config` does not validate.
    pub fn new(config: &GameConfig, source: S, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            session: Session::with_config(config, source),
            scheduler: Scheduler::new(config.speed),
            clock,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn start(&mut self) {
        self.scheduler.suspend();
        self.session.start();
        self.sync_scheduler();
    }

    pub fn reset(&mut self) {
        self.scheduler.suspend();
        self.session.reset();
        self.sync_scheduler();
    }

    /// Toggles between running and paused.
    pub fn pause(&mut self) {
        self.session.toggle_pause();
        self.sync_scheduler();
    }

    pub fn move_piece(&mut self, direction: Direction) -> Transition {
        let transition = self.session.try_move(direction);
        if direction.is_down() && transition.is_moved() {
            self.scheduler.arm(self.clock.now());
        }
        self.sync_scheduler();
        transition
    }

    pub fn rotate(&mut self) -> Transition {
        let transition = self.session.try_rotate();
        self.sync_scheduler();
        transition
    }

    /// Applies at most one gravity tick if the drop interval has elapsed.
    ///
    /// Returns [`Transition::Ignored`] when no tick was due.
    pub fn poll(&mut self) -> Transition {
        let level = self.session.stats().level();
        if !self.scheduler.poll(self.clock.now(), level) {
            return Transition::Ignored;
        }
        let transition = self.session.tick();
        self.sync_scheduler();
        transition
    }

    /// How long the caller may wait before the next [`Self::poll`], or
    /// `None` while gravity is suspended.
    #[must_use]
    pub fn poll_interval(&self) -> Option<Duration> {
        self.scheduler
            .is_armed()
            .then(|| self.scheduler.poll_interval(self.session.stats().level()))
    }

    fn sync_scheduler(&mut self) {
        let running = self.session.state().is_running();
        if !running && self.scheduler.is_armed() {
            self.scheduler.suspend();
            debug!(state = ?self.session.state(), "gravity suspended");
        } else if running && !self.scheduler.is_armed() {
            self.scheduler.arm(self.clock.now());
            debug!(level = self.session.stats().level(), "gravity armed");
        }
    }
}

impl Game<Pcg32, MonotonicClock> {
    /// Real-time game with a reproducible piece order.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, Pcg32::seed_from_u64(seed), MonotonicClock::new())
    }

    /// Real-time game seeded from the thread-local generator.
    pub fn from_entropy(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::new(config, Pcg32::from_rng(&mut rand::rng()), MonotonicClock::new())
    }
}
