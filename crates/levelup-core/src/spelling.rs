//! Spelling session engine.
//!
//! A session walks an ordered word sequence one word at a time. Guesses are
//! compared against the current word; correct answers earn a speed medal,
//! and five wrong guesses on the same word reveal it. The engine never
//! advances on its own: the caller shows feedback, then calls
//! [`SpellingSession::advance`].
//!
//! Once the final word is answered or revealed the session is
//! [`SessionState::Complete`] and rejects further input.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{QuestError, Result};
use crate::model::{Medal, Medals};
use crate::wordlist::WordEntry;

/// Total guesses allowed per word; the last wrong one forces a reveal.
pub const MAX_ATTEMPTS: u32 = 5;

/// Wrong guesses after which help is offered.
pub const HELP_AFTER_WRONG: u32 = 4;

/// Answers faster than this earn gold.
pub const GOLD_UNDER: Duration = Duration::from_secs(5);

/// Answers faster than this (and not gold) earn silver.
pub const SILVER_UNDER: Duration = Duration::from_secs(10);

/// Medal tier for a correct answer that took `elapsed`.
pub fn classify_medal(elapsed: Duration) -> Medal {
    if elapsed < GOLD_UNDER {
        Medal::Gold
    } else if elapsed < SILVER_UNDER {
        Medal::Silver
    } else {
        Medal::Bronze
    }
}

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Paused,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for a guess on the current word.
    Guessing,
    /// Current word answered or revealed; waiting for `advance`.
    Resolved,
    Complete,
}

/// Result of evaluating one guess.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    Correct {
        word: String,
        elapsed: Duration,
        medal: Medal,
        first_try: bool,
        is_session_complete: bool,
    },
    Incorrect {
        attempts_left: u32,
        show_help: bool,
    },
    Reveal {
        word: String,
        is_session_complete: bool,
    },
    /// The session is paused; nothing was evaluated.
    Paused,
    /// The current word is already resolved; call `advance` first.
    AwaitingAdvance,
    /// The session has finished; input is rejected.
    Complete,
}

impl GuessOutcome {
    /// Status label used by presentation layers.
    pub fn status(&self) -> &'static str {
        match self {
            GuessOutcome::Correct { .. } => "CORRECT",
            GuessOutcome::Incorrect { .. } => "INCORRECT",
            GuessOutcome::Reveal { .. } => "REVEAL",
            GuessOutcome::Paused => "PAUSED",
            GuessOutcome::AwaitingAdvance => "AWAITING_ADVANCE",
            GuessOutcome::Complete => "COMPLETE",
        }
    }

    /// Whether this outcome ends the session.
    pub fn is_session_complete(&self) -> bool {
        match self {
            GuessOutcome::Correct {
                is_session_complete,
                ..
            }
            | GuessOutcome::Reveal {
                is_session_complete,
                ..
            } => *is_session_complete,
            GuessOutcome::Complete => true,
            _ => false,
        }
    }
}

/// A single practice round over an ordered word sequence.
#[derive(Debug, Clone)]
pub struct SpellingSession {
    id: Uuid,
    words: Vec<WordEntry>,
    index: usize,
    wrong_count: u32,
    word_started: Instant,
    medals: Medals,
    paused: bool,
    phase: Phase,
}

impl SpellingSession {
    /// Start a session at the first word. An empty sequence is refused.
    pub fn new(words: Vec<WordEntry>) -> Result<Self> {
        if words.is_empty() {
            return Err(QuestError::NoWords {
                list: "session".to_string(),
            });
        }
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, words = words.len(), "spelling session started");
        Ok(Self {
            id,
            words,
            index: 0,
            wrong_count: 0,
            word_started: Instant::now(),
            medals: Medals::default(),
            paused: false,
            phase: Phase::Guessing,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The word being practiced, or `None` once the sequence is exhausted.
    pub fn current(&self) -> Option<&WordEntry> {
        match self.phase {
            Phase::Complete => None,
            _ => self.words.get(self.index),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    /// Medals earned so far in this session.
    pub fn medals(&self) -> Medals {
        self.medals
    }

    pub fn word_started(&self) -> Instant {
        self.word_started
    }

    pub fn state(&self) -> SessionState {
        if self.phase == Phase::Complete {
            SessionState::Complete
        } else if self.paused {
            SessionState::Paused
        } else {
            SessionState::Active
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Restart the clock for the current word, e.g. once it has been shown
    /// and spoken.
    pub fn restart_word_timer(&mut self) {
        self.word_started = Instant::now();
    }

    /// Flip between active and paused. Timers and counters are untouched.
    /// Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::debug!(session = %self.id, paused = self.paused, "pause toggled");
        self.paused
    }

    /// Evaluate a guess at the current instant.
    pub fn evaluate_guess(&mut self, input: &str) -> GuessOutcome {
        self.evaluate_guess_at(input, Instant::now())
    }

    /// Evaluate a guess as if it was submitted at `now`.
    pub fn evaluate_guess_at(&mut self, input: &str, now: Instant) -> GuessOutcome {
        if self.paused {
            return GuessOutcome::Paused;
        }
        match self.phase {
            Phase::Complete => return GuessOutcome::Complete,
            Phase::Resolved => return GuessOutcome::AwaitingAdvance,
            Phase::Guessing => {}
        }
        let Some(target) = self.words.get(self.index).map(|e| e.word.clone()) else {
            return GuessOutcome::Complete;
        };

        let is_session_complete = self.index + 1 >= self.words.len();
        let guess = input.trim().to_lowercase();

        if guess == target {
            let elapsed = now.saturating_duration_since(self.word_started);
            let medal = classify_medal(elapsed);
            self.medals.award(medal);
            let first_try = self.wrong_count == 0;
            self.resolve(is_session_complete);
            tracing::debug!(session = %self.id, word = %target, %medal, first_try, "correct");
            return GuessOutcome::Correct {
                word: target,
                elapsed,
                medal,
                first_try,
                is_session_complete,
            };
        }

        self.wrong_count += 1;
        let attempts_left = MAX_ATTEMPTS.saturating_sub(self.wrong_count);
        if attempts_left == 0 {
            self.resolve(is_session_complete);
            tracing::debug!(session = %self.id, word = %target, "revealed");
            GuessOutcome::Reveal {
                word: target,
                is_session_complete,
            }
        } else {
            GuessOutcome::Incorrect {
                attempts_left,
                show_help: self.wrong_count >= HELP_AFTER_WRONG,
            }
        }
    }

    /// Move to the next word, resetting the wrong-guess counter and timer.
    /// Returns `None` when the sequence is exhausted.
    pub fn advance(&mut self) -> Option<&WordEntry> {
        if self.phase == Phase::Complete {
            return None;
        }
        self.index += 1;
        self.wrong_count = 0;
        self.word_started = Instant::now();
        if self.index >= self.words.len() {
            self.phase = Phase::Complete;
            tracing::debug!(session = %self.id, "sequence exhausted");
            return None;
        }
        self.phase = Phase::Guessing;
        self.words.get(self.index)
    }

    fn resolve(&mut self, is_session_complete: bool) {
        self.phase = if is_session_complete {
            Phase::Complete
        } else {
            Phase::Resolved
        };
    }
}
