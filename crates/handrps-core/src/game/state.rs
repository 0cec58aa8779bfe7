//! Four-phase round state machine
//!
//! Waiting -> Countdown -> Playing -> Result -> Waiting, advanced once per frame by [`Game::tick`].
//! Time is passed in rather than read so rounds can be replayed in tests.

use super::config::GameConfig;
use crate::gesture::Gesture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// (player, computer) pairs the player wins
const WINNING_PAIRS: [(Gesture, Gesture); 3] = [
    (Gesture::Rock, Gesture::Scissors),
    (Gesture::Paper, Gesture::Rock),
    (Gesture::Scissors, Gesture::Paper),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Waiting,
    Countdown,
    Playing,
    Result,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Waiting => "WAITING",
            Phase::Countdown => "COUNTDOWN",
            Phase::Playing => "PLAYING",
            Phase::Result => "RESULT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Tie,
    PlayerWins,
    ComputerWins,
}

impl Outcome {
    pub fn resolve(player: Gesture, computer: Gesture) -> Self {
        if player == computer {
            Outcome::Tie
        } else if WINNING_PAIRS.contains(&(player, computer)) {
            Outcome::PlayerWins
        } else {
            Outcome::ComputerWins
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Tie => "Tie!",
            Outcome::PlayerWins => "You Win!",
            Outcome::ComputerWins => "Computer Wins!",
        }
    }
}

/// Running score since process start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub computer: u32,
}

impl Score {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Tie => {}
            Outcome::PlayerWins => self.player += 1,
            Outcome::ComputerWins => self.computer += 1,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player: {}, Computer: {}", self.player, self.computer)
    }
}

/// The whole mutable record of a run
#[derive(Debug)]
pub struct Game<R = StdRng> {
    pub config: GameConfig,
    pub phase: Phase,
    pub countdown: u32,
    /// Time of the last countdown step
    pub last_tick: Option<Instant>,
    /// Time the current result went on screen
    pub result_since: Option<Instant>,
    pub computer_choice: Option<Gesture>,
    pub player_choice: Option<Gesture>,
    pub outcome: Option<Outcome>,
    pub score: Score,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Game with a reproducible computer opponent.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            countdown: config.countdown_start,
            config,
            phase: Phase::Waiting,
            last_tick: None,
            result_since: None,
            computer_choice: None,
            player_choice: None,
            outcome: None,
            score: Score::default(),
            rng,
        }
    }

    /// Result text for the current round, empty until one resolves.
    pub fn result(&self) -> &'static str {
        self.outcome.map(|o| o.message()).unwrap_or("")
    }

    /// Pick the computer's gesture uniformly at random.
    pub fn get_computer_choice(&mut self) -> Gesture {
        let choice = Gesture::ALL[self.rng.gen_range(0..Gesture::ALL.len())];
        log::debug!("Computer chose {}", choice);
        choice
    }

    /// Resolve the round from the recorded choices and update the score.
    ///
    /// `None` if either side has not chosen yet.
    pub fn determine_winner(&mut self) -> Option<Outcome> {
        let outcome = Outcome::resolve(self.player_choice?, self.computer_choice?);
        self.score.record(outcome);
        self.outcome = Some(outcome);
        match outcome {
            Outcome::Tie => log::info!("Game resulted in a tie"),
            Outcome::PlayerWins => log::info!("Player wins! New score - {}", self.score),
            Outcome::ComputerWins => log::info!("Computer wins! New score - {}", self.score),
        }
        Some(outcome)
    }

    /// Advance the machine by one frame.
    ///
    /// `gesture` is only looked at while playing and only counts when a hand is present.
    /// Returns the phase entered, if the phase changed.
    pub fn tick(&mut self, now: Instant, hand_detected: bool, gesture: Option<Gesture>) -> Option<Phase> {
        let next = match self.phase {
            Phase::Waiting => self.tick_waiting(now, hand_detected),
            Phase::Countdown => self.tick_countdown(now),
            Phase::Playing => self.tick_playing(now, hand_detected, gesture),
            Phase::Result => self.tick_result(now),
        }?;
        self.phase = next;
        Some(next)
    }

    fn tick_waiting(&mut self, now: Instant, hand_detected: bool) -> Option<Phase> {
        if !hand_detected {
            return None;
        }
        log::debug!("Hand detected, starting countdown");
        self.countdown = self.config.countdown_start;
        self.last_tick = Some(now);
        Some(Phase::Countdown)
    }

    fn tick_countdown(&mut self, now: Instant) -> Option<Phase> {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };
        if now.saturating_duration_since(last) < self.config.tick_interval() {
            return None;
        }

        self.countdown = self.countdown.saturating_sub(1);
        self.last_tick = Some(now);
        log::debug!("Countdown: {}", self.countdown);
        if self.countdown > 0 {
            return None;
        }

        log::info!("Countdown finished, starting game");
        self.computer_choice = Some(self.get_computer_choice());
        Some(Phase::Playing)
    }

    fn tick_playing(&mut self, now: Instant, hand_detected: bool, gesture: Option<Gesture>) -> Option<Phase> {
        let gesture = gesture.filter(|_| hand_detected)?;
        // nothing changes until both sides have chosen
        self.computer_choice?;
        log::info!("Player chose {}", gesture);

        self.player_choice = Some(gesture);
        self.determine_winner()?;
        self.countdown = self.config.countdown_start;
        self.result_since = Some(now);
        Some(Phase::Result)
    }

    fn tick_result(&mut self, now: Instant) -> Option<Phase> {
        let since = *self.result_since.get_or_insert(now);
        if now.saturating_duration_since(since) < self.config.result_display() {
            return None;
        }

        log::debug!("Resetting game state to {}", Phase::Waiting);
        self.reset_round();
        Some(Phase::Waiting)
    }

    fn reset_round(&mut self) {
        self.countdown = self.config.countdown_start;
        self.last_tick = None;
        self.result_since = None;
        self.computer_choice = None;
        self.player_choice = None;
        self.outcome = None;
    }
}
