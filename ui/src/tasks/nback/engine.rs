//! Trial sequencer state machine: scheduling, miss detection, scoring, and
//! adaptive difficulty.
//!
//! The engine is pure and timestamp-injected; it never sleeps or spawns.
//! Every outcome that needs a deferred follow-up carries a
//! [`ScheduledAdvance`] with the current `run_id` and a scheduling `epoch`,
//! and [`NBackEngine::advance_due`]/[`NBackEngine::tick`] drop events whose
//! ids no longer match. That makes a cancelled or superseded callback a
//! strict no-op, which is the entire concurrency story: all mutation happens
//! on serialized event invocations.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::{RuleAttribute, TrainerConfig};
use super::metrics::SessionSummary;
use super::perspective::{judged_value, RelabelTables};
use super::stimulus::{self, Color, Stimulus};
use crate::core::timing::InstantStamp;

/// Trials per adaptive-difficulty block.
pub const BLOCK_SIZE: u32 = 20;
/// Cadence between trials when the player does not respond.
pub const ADVANCE_INTERVAL_MS: u64 = 3500;
/// Shortened delay to the next trial once a response has been scored.
pub const POST_RESPONSE_DELAY_MS: u64 = 500;

// Game-balance tunables, not load-bearing invariants.
const BASE_POINTS: i64 = 10;
const LEVEL_POINTS: i64 = 5;
const FLAT_PENALTY: i64 = 5;
const SPEED_WINDOW_MS: f64 = 2000.0;
const SPEED_STEP_MS: f64 = 150.0;
const SPEED_BONUS_CAP: i64 = 10;
const PROMOTE_ACCURACY: f64 = 0.80;
const DEMOTE_ACCURACY: f64 = 0.50;
const SWAP_CHANCE: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    Match,
    NonMatch,
}

/// Physical input side; the mapping to [`ResponseAction`] depends on the
/// per-trial control-swap state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    NoActiveRules,
}

impl std::fmt::Display for StartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartError::NoActiveRules => {
                write!(f, "select at least one attribute to train before starting")
            }
        }
    }
}

impl std::error::Error for StartError {}

/// Mutable per-session bookkeeping, owned by the engine as one value object.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub score: i64,
    pub trials: u32,
    pub mistakes: u32,
    pub block_trials: u32,
    pub block_mistakes: u32,
    /// Current n-back level, ≥ 1.
    pub level: u32,
    /// The attribute judged on the current trial.
    pub rule: RuleAttribute,
    /// Whether left currently means "no match" instead of "match".
    pub controls_swapped: bool,
    /// Set once a response for the current trial has been scored.
    pub responded: bool,
    pub remaining_secs: u32,
    pub countdown_started: bool,
}

impl SessionState {
    fn new(cfg: &TrainerConfig, rule: RuleAttribute) -> Self {
        Self {
            score: 0,
            trials: 0,
            mistakes: 0,
            block_trials: 0,
            block_mistakes: 0,
            level: cfg.nback.max(1),
            rule,
            controls_swapped: false,
            responded: false,
            remaining_secs: cfg.session_secs,
            countdown_started: false,
        }
    }
}

/// Identifies one pending deferred advance. Stale ids are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAdvance {
    pub run_id: u64,
    pub epoch: u64,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Promoted(u32),
    Demoted(u32),
}

impl LevelChange {
    pub fn level(self) -> u32 {
        match self {
            LevelChange::Promoted(level) | LevelChange::Demoted(level) => level,
        }
    }
}

/// Result of advancing to a new trial: what to render and what to schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialUpdate {
    pub stimulus: Stimulus,
    pub rule: RuleAttribute,
    /// The just-finished trial went unanswered and was penalized.
    pub missed: bool,
    pub level_change: Option<LevelChange>,
    /// The once-only session countdown should start ticking now.
    pub start_countdown: bool,
    pub schedule: ScheduledAdvance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseFeedback {
    pub correct: bool,
    /// Signed score delta already applied.
    pub points: i64,
    pub reaction_ms: f64,
    pub schedule: ScheduledAdvance,
}

/// Finalized session data, produced only by a countdown timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub summary: SessionSummary,
    /// Level to persist for the next session (after any end-of-session
    /// auto-progress adjustment).
    pub level_after: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Ignored,
    Running { remaining_secs: u32 },
    Finished(SessionOutcome),
}

pub struct NBackEngine {
    pub config: TrainerConfig,
    pub state: EngineState,
    pub run_id: u64,
    pub session: SessionState,
    /// Append-only trial history for the current session.
    pub history: Vec<Stimulus>,
    tables: RelabelTables,
    rng: SmallRng,
    epoch: u64,
    last_word: Option<Color>,
}

impl NBackEngine {
    pub fn new(config: TrainerConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic constructor for tests.
    pub fn with_rng(config: TrainerConfig, mut rng: SmallRng) -> Self {
        let tables = RelabelTables::generate(&mut rng);
        let first_rule = config
            .active_rules
            .first()
            .copied()
            .unwrap_or(RuleAttribute::Color);
        let session = SessionState::new(&config, first_rule);
        Self {
            config,
            state: EngineState::Idle,
            run_id: 0,
            session,
            history: Vec::new(),
            tables,
            rng,
            epoch: 0,
            last_word: None,
        }
    }

    /// Starts a session, resetting any session already in progress. Fails
    /// without touching state when no judgment rule is active.
    pub fn start(&mut self, now: InstantStamp) -> Result<TrialUpdate, StartError> {
        if self.config.active_rules.is_empty() {
            return Err(StartError::NoActiveRules);
        }

        self.run_id += 1;
        self.epoch = 0;
        self.tables = RelabelTables::generate(&mut self.rng);
        self.session = SessionState::new(&self.config, self.config.active_rules[0]);
        self.history.clear();
        self.last_word = None;
        self.state = EngineState::Running;

        Ok(self.advance(true, now))
    }

    /// Handles a fired advance timer. Returns `None` when the event is stale:
    /// a different run, or superseded by a response's reschedule.
    pub fn advance_due(&mut self, run_id: u64, epoch: u64, now: InstantStamp) -> Option<TrialUpdate> {
        if self.state != EngineState::Running || run_id != self.run_id || epoch != self.epoch {
            return None;
        }
        Some(self.advance(false, now))
    }

    fn advance(&mut self, initial: bool, now: InstantStamp) -> TrialUpdate {
        // A judgeable trial that ended without a response is a miss.
        let missed = !initial
            && self.history.len() > self.session.level as usize
            && !self.session.responded;
        if missed {
            self.session.score -= FLAT_PENALTY;
            self.session.mistakes += 1;
            self.session.block_mistakes += 1;
            self.session.trials += 1;
            self.session.block_trials += 1;
        }

        let level_change = self.block_check();

        self.session.controls_swapped =
            self.config.control_swap && self.rng.gen_bool(SWAP_CHANCE);

        let rule_idx = self.rng.gen_range(0..self.config.active_rules.len());
        self.session.rule = self.config.active_rules[rule_idx];

        let stim = stimulus::generate(&self.config, self.last_word, &mut self.rng, now);
        self.last_word = Some(stim.stroop.word);
        self.history.push(stim.clone());
        self.session.responded = false;

        let start_countdown = self.config.timer
            && !self.session.countdown_started
            && self.history.len() > self.session.level as usize;
        if start_countdown {
            self.session.countdown_started = true;
        }

        TrialUpdate {
            stimulus: stim,
            rule: self.session.rule,
            missed,
            level_change,
            start_countdown,
            schedule: self.arm(ADVANCE_INTERVAL_MS),
        }
    }

    /// Scores an explicit response. Returns `None` when there is no session,
    /// no valid n-back-ago trial yet, or the trial was already answered.
    pub fn respond(&mut self, action: ResponseAction, now: InstantStamp) -> Option<ResponseFeedback> {
        if self.state != EngineState::Running {
            return None;
        }
        let n = self.session.level as usize;
        if self.history.len() <= n || self.session.responded {
            return None;
        }

        self.session.responded = true;
        self.session.trials += 1;
        self.session.block_trials += 1;

        let current = &self.history[self.history.len() - 1];
        let cue = &self.history[self.history.len() - 1 - n];
        let same = judged_value(current, self.session.rule, &self.config, &self.tables)
            == judged_value(cue, self.session.rule, &self.config, &self.tables);
        let correct = (action == ResponseAction::Match) == same;

        let reaction_ms = now - current.created_at;
        let points = if correct {
            BASE_POINTS + LEVEL_POINTS * self.session.level as i64 + speed_bonus(reaction_ms)
        } else {
            self.session.mistakes += 1;
            self.session.block_mistakes += 1;
            -FLAT_PENALTY
        };
        self.session.score += points;

        Some(ResponseFeedback {
            correct,
            points,
            reaction_ms,
            schedule: self.arm(POST_RESPONSE_DELAY_MS),
        })
    }

    /// Maps a physical side to match/non-match under the current swap state
    /// and scores it.
    pub fn respond_side(&mut self, side: InputSide, now: InstantStamp) -> Option<ResponseFeedback> {
        let action = match (side, self.session.controls_swapped) {
            (InputSide::Left, false) | (InputSide::Right, true) => ResponseAction::Match,
            _ => ResponseAction::NonMatch,
        };
        self.respond(action, now)
    }

    /// One second of session countdown. Finalizes the session at zero.
    pub fn tick(&mut self, run_id: u64) -> TickOutcome {
        if self.state != EngineState::Running
            || run_id != self.run_id
            || !self.config.timer
            || !self.session.countdown_started
        {
            return TickOutcome::Ignored;
        }

        self.session.remaining_secs = self.session.remaining_secs.saturating_sub(1);
        if self.session.remaining_secs > 0 {
            TickOutcome::Running {
                remaining_secs: self.session.remaining_secs,
            }
        } else {
            TickOutcome::Finished(self.finalize())
        }
    }

    /// Manual stop: invalidates all pending callbacks, persists nothing.
    pub fn stop(&mut self) {
        self.state = EngineState::Idle;
        self.run_id += 1;
    }

    pub fn current(&self) -> Option<&Stimulus> {
        self.history.last()
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Whether the current trial has a valid n-back-ago cue to judge.
    pub fn judgeable(&self) -> bool {
        self.history.len() > self.session.level as usize
    }

    fn finalize(&mut self) -> SessionOutcome {
        // Summary captures the level as it was during play, before any
        // end-of-session adjustment.
        let summary = SessionSummary::from_session(&self.session);

        let level_after = if self.config.auto_progress && self.session.trials > 0 {
            match level_adjustment(
                self.session.level,
                self.session.trials,
                self.session.mistakes,
            ) {
                Some(change) => change.level(),
                None => self.session.level,
            }
        } else {
            self.session.level
        };

        self.state = EngineState::Idle;
        self.run_id += 1;

        SessionOutcome {
            summary,
            level_after,
        }
    }

    /// Per-block difficulty check. Runs only when auto-progress is on and
    /// the session timer is off; the timed path adjusts once at session end
    /// instead.
    fn block_check(&mut self) -> Option<LevelChange> {
        if !self.config.auto_progress || self.config.timer {
            return None;
        }
        if self.session.block_trials < BLOCK_SIZE {
            return None;
        }

        let change = level_adjustment(
            self.session.level,
            self.session.block_trials,
            self.session.block_mistakes,
        );
        if let Some(change) = change {
            self.session.level = change.level();
        }
        self.session.block_trials = 0;
        self.session.block_mistakes = 0;
        change
    }

    fn arm(&mut self, delay_ms: u64) -> ScheduledAdvance {
        self.epoch += 1;
        ScheduledAdvance {
            run_id: self.run_id,
            epoch: self.epoch,
            delay_ms,
        }
    }
}

fn speed_bonus(reaction_ms: f64) -> i64 {
    let raw = ((SPEED_WINDOW_MS - reaction_ms) / SPEED_STEP_MS).floor() as i64;
    raw.clamp(0, SPEED_BONUS_CAP)
}

fn level_adjustment(level: u32, trials: u32, mistakes: u32) -> Option<LevelChange> {
    let accuracy = (trials - mistakes) as f64 / trials as f64;
    if accuracy >= PROMOTE_ACCURACY {
        Some(LevelChange::Promoted(level + 1))
    } else if accuracy < DEMOTE_ACCURACY && level > 1 {
        Some(LevelChange::Demoted(level - 1))
    } else {
        None
    }
}
