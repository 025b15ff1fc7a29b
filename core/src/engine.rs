use core::fmt;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    Idle,
    Revealing,
    AwaitingInput,
    Evaluated,
}

impl RoundState {
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Evaluated)
    }

    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Revealing | Self::AwaitingInput)
    }
}

/// Game state of the memory grid: owns the target pattern, the player's selection and the
/// pending reveal timer.
///
/// Rendering goes through the [`RoundObserver`], timing through the [`RevealScheduler`]. The
/// pending timer is owned by the engine and dropped, which cancels it, whenever a round is
/// superseded or the engine itself is dropped.
pub struct RecallEngine<S: RevealScheduler, O: RoundObserver> {
    config: RoundConfig,
    sampling: Sampling,
    rng: SmallRng,
    state: RoundState,
    round: RoundId,
    target: Pattern,
    selection: Pattern,
    verdict: Option<Verdict>,
    pending_reveal: Option<S::Pending>,
    scheduler: S,
    observer: O,
}

impl<S: RevealScheduler, O: RoundObserver> RecallEngine<S, O> {
    pub fn new(config: RoundConfig, seed: u64, scheduler: S, observer: O) -> Self {
        let size = config.size();
        Self {
            config,
            sampling: Sampling::default(),
            rng: SmallRng::seed_from_u64(seed),
            state: RoundState::default(),
            round: RoundId::default(),
            target: Pattern::empty(size),
            selection: Pattern::empty(size),
            verdict: None,
            pending_reveal: None,
            scheduler,
            observer,
        }
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn round_id(&self) -> RoundId {
        self.round
    }

    pub fn target(&self) -> &Pattern {
        &self.target
    }

    pub fn selection(&self) -> &Pattern {
        &self.selection
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_input_enabled(&self) -> bool {
        self.state.accepts_input()
    }

    pub fn has_pending_reveal(&self) -> bool {
        self.pending_reveal.is_some()
    }

    /// Cells the player still has to pick before the answer is checked.
    pub fn remaining(&self) -> CellCount {
        self.config.count() - self.selection.marked_count()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Validates and applies new grid parameters, keeping the current reveal delay.
    ///
    /// A round in progress is abandoned, the engine goes back to [`RoundState::Idle`].
    pub fn configure(&mut self, size: Coord, count: CellCount) -> Result<()> {
        let config = RoundConfig::with_reveal_delay(size, count, self.config.reveal_delay_ms())?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_config(&mut self, config: RoundConfig) {
        if self.state.is_in_progress() {
            log::debug!("round {} abandoned by reconfiguration", self.round.get());
        }
        self.cancel_pending_reveal();
        self.config = config;
        self.state = RoundState::Idle;
        self.target = Pattern::empty(config.size());
        self.selection = Pattern::empty(config.size());
        self.verdict = None;
    }

    /// Starts a round with a freshly generated pattern. Only accepted from `Idle` or `Evaluated`.
    pub fn start(&mut self) -> bool {
        if !self.state.can_start() {
            log::trace!("start ignored in state {:?}", self.state);
            return false;
        }
        let target = self.generate_target();
        self.begin_round(target);
        true
    }

    /// Like [`start`](Self::start), with a given target that must fit the configuration.
    pub fn start_with(&mut self, target: Pattern) -> Result<bool> {
        self.check_fits(&target)?;
        if !self.state.can_start() {
            log::trace!("start ignored in state {:?}", self.state);
            return Ok(false);
        }
        self.begin_round(target);
        Ok(true)
    }

    /// Abandons whatever round is running and starts a new one, from any state.
    pub fn restart(&mut self) {
        self.cancel_pending_reveal();
        self.observer.on_restart();
        let target = self.generate_target();
        self.begin_round(target);
    }

    pub fn restart_with(&mut self, target: Pattern) -> Result<()> {
        self.check_fits(&target)?;
        self.cancel_pending_reveal();
        self.observer.on_restart();
        self.begin_round(target);
        Ok(())
    }

    /// Called by the scheduler when the reveal delay of `round` has elapsed.
    pub fn finish_reveal(&mut self, round: RoundId) -> bool {
        if round != self.round || !matches!(self.state, RoundState::Revealing) {
            log::warn!(
                "ignoring stale reveal timer for round {} (current round {}, {:?})",
                round.get(),
                self.round.get(),
                self.state
            );
            return false;
        }

        self.pending_reveal = None;
        self.state = RoundState::AwaitingInput;
        log::debug!("round {}: pattern hidden, awaiting input", self.round.get());
        self.observer.on_hide_reveal(&self.selection);
        true
    }

    pub fn select(&mut self, coords: Coord2) -> SelectOutcome {
        if !self.state.accepts_input() {
            log::trace!("select {:?} ignored in state {:?}", coords, self.state);
            return SelectOutcome::NoChange;
        }

        let Ok(coords) = self.selection.validate_coords(coords) else {
            log::trace!("select {:?} ignored, out of range", coords);
            return SelectOutcome::NoChange;
        };

        if !self.selection.mark(coords).has_update() {
            return SelectOutcome::NoChange;
        }
        self.observer.on_selection_changed(&self.selection);

        if self.selection.marked_count() == self.config.count() {
            self.evaluate()
        } else {
            SelectOutcome::Selected
        }
    }

    fn evaluate(&mut self) -> SelectOutcome {
        let verdict = if self.selection.matches(&self.target) {
            Verdict::Won
        } else {
            Verdict::Lost
        };

        self.state = RoundState::Evaluated;
        self.verdict = Some(verdict);
        log::debug!("round {}: {:?}", self.round.get(), verdict);

        match verdict {
            Verdict::Won => {
                self.observer.on_win();
                SelectOutcome::Won
            }
            Verdict::Lost => {
                self.observer.on_lose();
                SelectOutcome::Lost
            }
        }
    }

    fn begin_round(&mut self, target: Pattern) {
        self.cancel_pending_reveal();

        let size = self.config.size();
        self.round = self.round.next();
        self.target = target;
        self.selection = Pattern::empty(size);
        self.verdict = None;
        self.state = RoundState::Revealing;
        log::debug!(
            "round {}: revealing {} of {} cells",
            self.round.get(),
            self.target.marked_count(),
            self.target.total_cells()
        );

        self.observer.on_reveal(&self.target);
        self.pending_reveal = Some(
            self.scheduler
                .schedule(self.round, self.config.reveal_delay_ms()),
        );
    }

    fn generate_target(&mut self) -> Pattern {
        let seed = self.rng.random();
        RandomPatternGenerator::new(seed, self.sampling).generate(self.config)
    }

    fn cancel_pending_reveal(&mut self) {
        if self.pending_reveal.take().is_some() {
            log::debug!("round {}: pending reveal timer cancelled", self.round.get());
        }
    }

    fn check_fits(&self, target: &Pattern) -> Result<()> {
        if target.fits(&self.config) {
            Ok(())
        } else {
            Err(GameError::PatternMismatch)
        }
    }
}

impl<O: RoundObserver> RecallEngine<ManualScheduler, O> {
    /// Advances the manual clock and delivers any reveal timers that came due.
    pub fn advance(&mut self, ms: u64) -> bool {
        let fired = self.scheduler.advance(ms);
        fired
            .into_iter()
            .fold(false, |updated, round| self.finish_reveal(round) || updated)
    }
}

impl<S: RevealScheduler, O: RoundObserver> fmt::Debug for RecallEngine<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecallEngine")
            .field("config", &self.config)
            .field("sampling", &self.sampling)
            .field("state", &self.state)
            .field("round", &self.round)
            .field("target", &self.target)
            .field("selection", &self.selection)
            .field("verdict", &self.verdict)
            .field("pending_reveal", &self.pending_reveal.is_some())
            .finish_non_exhaustive()
    }
}
