//! Memory game driver.
//!
//! Wraps a [`MemoryBoard`] with the parts that take time: feedback delays,
//! target announcements, and the spoken explanation of a rejected pair.
//! Each of these runs as a spawned continuation that holds the board lock
//! until it finishes, so flips arriving in the meantime are ignored.
//!
//! Continuations capture the board id they were scheduled for and do
//! nothing once that board has been exited or replaced. Every wait on
//! speech is raced against a timeout.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use uuid::Uuid;

use crate::error::Result;
use crate::ledger::{self, LedgerUpdate};
use crate::memory::{Card, FlipOutcome, MemoryBoard, Settle};
use crate::model::Student;
use crate::traits::{Presenter, Speech};

/// Spoken after a credited match.
pub const PRAISE_PHRASES: [&str; 7] = [
    "Awesome!",
    "Great Job!",
    "Super!",
    "Fantastic!",
    "You did it!",
    "Match!",
    "Way to go!",
];

/// Delays and safety timeouts for the memory game.
#[derive(Debug, Clone)]
pub struct MemoryTimings {
    /// Pause before praising a credited match.
    pub match_reveal: Duration,
    /// Pause after the praise before the next target.
    pub match_settle: Duration,
    /// How long a mismatched pair stays face up.
    pub mismatch_delay: Duration,
    /// How long a rejected pair stays visible before the explanation.
    pub reject_pause: Duration,
    /// Pause after the explanation before the cards turn back.
    pub reject_settle: Duration,
    /// Upper bound on waiting for a target to be spelled out.
    pub speech_timeout: Duration,
    /// Upper bound on waiting for the rejection explanation.
    pub reject_speech_timeout: Duration,
}

impl Default for MemoryTimings {
    fn default() -> Self {
        Self {
            match_reveal: Duration::from_millis(800),
            match_settle: Duration::from_millis(2_000),
            mismatch_delay: Duration::from_millis(1_500),
            reject_pause: Duration::from_millis(1_000),
            reject_settle: Duration::from_millis(1_000),
            speech_timeout: Duration::from_millis(6_000),
            reject_speech_timeout: Duration::from_millis(8_000),
        }
    }
}

/// Configuration for a memory game.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    pub timings: MemoryTimings,
    /// Voice passed to every speech call.
    pub voice: Option<String>,
    /// Seed for dealing and target selection; entropy when `None`.
    pub seed: Option<u64>,
}

/// Coarse board state, observable while continuations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// A pair is resolving or a target is being announced.
    Locked,
    /// Waiting for the learner to flip a card.
    Ready,
    Won,
    /// The game was exited.
    Closed,
}

/// Events delivered to the presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryEvent {
    Dealt {
        cards: usize,
        pairs: usize,
    },
    TargetAnnounced {
        target: String,
    },
    CardFlipped {
        card: usize,
        word: String,
    },
    Matched {
        word: String,
        matches_found: usize,
        total_pairs: usize,
        xp_awarded: u64,
        praise: &'static str,
    },
    Rejected {
        found: String,
        target: String,
    },
    Mismatch {
        first: String,
        second: String,
        target: String,
    },
    /// Unmatched cards of the last pair turned face down.
    CardsHidden,
    /// The board accepts flips again.
    Ready,
    /// Speech never signalled completion; the game moved on anyway.
    SpeechTimedOut {
        text: String,
    },
    Won {
        xp_awarded: u64,
        goal_reached: bool,
    },
}

/// Work scheduled after a pair is evaluated.
enum FollowUp {
    Match {
        id: Uuid,
        praise: &'static str,
        win: Option<LedgerUpdate>,
    },
    Reject {
        id: Uuid,
        found: String,
        target: String,
    },
    Mismatch {
        id: Uuid,
    },
}

#[derive(Clone, Copy)]
enum Announce {
    NewTarget,
    Repeat,
}

struct GameState {
    board: Option<MemoryBoard>,
    student: Student,
    rng: ChaCha8Rng,
}

struct Shared {
    state: Mutex<GameState>,
    speech: Arc<dyn Speech>,
    presenter: Arc<dyn Presenter>,
    config: MemoryConfig,
    phase_tx: watch::Sender<BoardPhase>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn voice(&self) -> Option<&str> {
        self.config.voice.as_deref()
    }

    fn set_phase(&self, phase: BoardPhase) {
        self.phase_tx.send_replace(phase);
    }

    fn present(&self, event: MemoryEvent) {
        self.presenter.on_memory_event(&event);
    }

    /// Run `f` on the board if it is still the one identified by `id`.
    fn with_board<T>(&self, id: Uuid, f: impl FnOnce(&mut MemoryBoard) -> T) -> Option<T> {
        let mut state = self.lock();
        match state.board.as_mut() {
            Some(board) if board.id() == id => Some(f(board)),
            _ => {
                tracing::debug!(board = %id, "stale continuation dropped");
                None
            }
        }
    }
}

/// A running memory game bound to one student.
pub struct MemoryGame {
    shared: Arc<Shared>,
}

impl MemoryGame {
    /// Deal a board from `words` and announce the first target.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        student: Student,
        words: &[String],
        config: MemoryConfig,
        speech: Arc<dyn Speech>,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let board = MemoryBoard::new(words, &mut rng)?;
        let id = board.id();
        let dealt = MemoryEvent::Dealt {
            cards: board.cards().len(),
            pairs: board.total_pairs(),
        };
        let (phase_tx, _) = watch::channel(BoardPhase::Locked);
        let shared = Arc::new(Shared {
            state: Mutex::new(GameState {
                board: Some(board),
                student,
                rng,
            }),
            speech,
            presenter,
            config,
            phase_tx,
        });
        shared.present(dealt);
        tokio::spawn(announce(Arc::clone(&shared), id, Announce::NewTarget));
        Ok(Self { shared })
    }

    /// Deal a fresh board from `words`, discarding the current one.
    pub fn restart(&self, words: &[String]) -> Result<()> {
        let shared = &self.shared;
        let (id, dealt) = {
            let mut state = shared.lock();
            let board = MemoryBoard::new(words, &mut state.rng)?;
            let id = board.id();
            let dealt = MemoryEvent::Dealt {
                cards: board.cards().len(),
                pairs: board.total_pairs(),
            };
            state.board = Some(board);
            (id, dealt)
        };
        shared.speech.cancel_all();
        shared.set_phase(BoardPhase::Locked);
        shared.present(dealt);
        tokio::spawn(announce(Arc::clone(shared), id, Announce::NewTarget));
        Ok(())
    }

    /// Select a card. Selections while the board is locked, on matched
    /// cards, or on the already-flipped card are ignored.
    pub fn flip(&self, index: usize) -> FlipOutcome {
        let shared = &self.shared;
        let mut events = Vec::new();
        let mut follow_up = None;

        let (outcome, word) = {
            let mut guard = shared.lock();
            let state = &mut *guard;
            let Some(board) = state.board.as_mut() else {
                return FlipOutcome::Ignored;
            };
            let outcome = board.flip(index);
            if outcome == FlipOutcome::Ignored {
                return outcome;
            }
            let id = board.id();
            let word = board.cards()[index].word.clone();
            events.push(MemoryEvent::CardFlipped {
                card: index,
                word: word.clone(),
            });

            match &outcome {
                FlipOutcome::TargetMatch {
                    word,
                    matches_found,
                    total_pairs,
                    won,
                } => {
                    let update = ledger::record_memory_match(&mut state.student);
                    let praise = PRAISE_PHRASES
                        .choose(&mut state.rng)
                        .copied()
                        .unwrap_or(PRAISE_PHRASES[0]);
                    events.push(MemoryEvent::Matched {
                        word: word.clone(),
                        matches_found: *matches_found,
                        total_pairs: *total_pairs,
                        xp_awarded: update.xp_awarded,
                        praise,
                    });
                    let win = if *won {
                        Some(ledger::record_memory_win(
                            &mut state.student,
                            ledger::today(),
                        ))
                    } else {
                        None
                    };
                    follow_up = Some(FollowUp::Match { id, praise, win });
                }
                FlipOutcome::NonTargetMatch { word, target } => {
                    events.push(MemoryEvent::Rejected {
                        found: word.clone(),
                        target: target.clone(),
                    });
                    follow_up = Some(FollowUp::Reject {
                        id,
                        found: word.clone(),
                        target: target.clone(),
                    });
                }
                FlipOutcome::Mismatch {
                    first,
                    second,
                    target,
                } => {
                    events.push(MemoryEvent::Mismatch {
                        first: first.clone(),
                        second: second.clone(),
                        target: target.clone(),
                    });
                    follow_up = Some(FollowUp::Mismatch { id });
                }
                FlipOutcome::FirstFlipped { .. } | FlipOutcome::Ignored => {}
            }
            (outcome, word)
        };

        if follow_up.is_some() {
            shared.set_phase(BoardPhase::Locked);
        }
        shared.speech.speak(&word, shared.voice());
        for event in events {
            shared.present(event);
        }
        if let Some(follow_up) = follow_up {
            tokio::spawn(run_follow_up(Arc::clone(shared), follow_up));
        }
        outcome
    }

    /// Abandon the game. Pending continuations become no-ops.
    /// Returns the student record with everything earned so far.
    pub fn exit(&self) -> Student {
        let student = {
            let mut state = self.shared.lock();
            state.board = None;
            state.student.clone()
        };
        self.shared.speech.cancel_all();
        self.shared.set_phase(BoardPhase::Closed);
        tracing::debug!("memory game exited");
        student
    }

    pub fn phase(&self) -> BoardPhase {
        *self.shared.phase_tx.borrow()
    }

    /// Wait until the board is no longer locked.
    pub async fn wait_ready(&self) -> BoardPhase {
        let mut rx = self.shared.phase_tx.subscribe();
        let phase = match rx.wait_for(|phase| *phase != BoardPhase::Locked).await {
            Ok(phase) => *phase,
            Err(_) => BoardPhase::Closed,
        };
        phase
    }

    /// The student record including rewards earned so far.
    pub fn student(&self) -> Student {
        self.shared.lock().student.clone()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.shared
            .lock()
            .board
            .as_ref()
            .map(|b| b.cards().to_vec())
            .unwrap_or_default()
    }

    pub fn current_target(&self) -> Option<String> {
        self.shared
            .lock()
            .board
            .as_ref()
            .and_then(|b| b.current_target().map(str::to_string))
    }

    pub fn remaining_targets(&self) -> Vec<String> {
        self.shared
            .lock()
            .board
            .as_ref()
            .map(|b| b.remaining_targets().to_vec())
            .unwrap_or_default()
    }

    /// `(matches found, total pairs)`.
    pub fn progress(&self) -> (usize, usize) {
        self.shared
            .lock()
            .board
            .as_ref()
            .map(|b| (b.matches_found(), b.total_pairs()))
            .unwrap_or((0, 0))
    }
}

async fn run_follow_up(shared: Arc<Shared>, follow_up: FollowUp) {
    let timings = shared.config.timings.clone();
    match follow_up {
        FollowUp::Match { id, praise, win } => {
            sleep(timings.match_reveal).await;
            if shared.with_board(id, |_| ()).is_none() {
                return;
            }
            shared.speech.speak(praise, shared.voice());
            sleep(timings.match_settle).await;
            match shared.with_board(id, MemoryBoard::settle) {
                Some(Settle::Won) => {
                    let update = win.unwrap_or_default();
                    shared.set_phase(BoardPhase::Won);
                    tracing::info!(xp = update.xp_awarded, "memory board cleared");
                    shared.present(MemoryEvent::Won {
                        xp_awarded: update.xp_awarded,
                        goal_reached: update.goal_reached,
                    });
                }
                Some(Settle::NextTarget) => announce(shared, id, Announce::NewTarget).await,
                Some(_) | None => {}
            }
        }
        FollowUp::Reject { id, found, target } => {
            sleep(timings.reject_pause).await;
            if shared.with_board(id, |_| ()).is_none() {
                return;
            }
            let text = format!("That is {found}. But we need {target}.");
            shared.speech.cancel_all();
            let spoken = timeout(
                timings.reject_speech_timeout,
                shared.speech.speak_and_wait(&text, shared.voice()),
            )
            .await;
            if spoken.is_err() {
                tracing::warn!("rejection speech did not finish, continuing");
                shared.present(MemoryEvent::SpeechTimedOut { text });
            }
            sleep(timings.reject_settle).await;
            if shared.with_board(id, MemoryBoard::settle).is_some() {
                shared.present(MemoryEvent::CardsHidden);
                announce(shared, id, Announce::Repeat).await;
            }
        }
        FollowUp::Mismatch { id } => {
            sleep(timings.mismatch_delay).await;
            if shared.with_board(id, MemoryBoard::settle).is_some() {
                shared.present(MemoryEvent::CardsHidden);
                announce(shared, id, Announce::Repeat).await;
            }
        }
    }
}

/// Say the target, spell it out, then open the board.
async fn announce(shared: Arc<Shared>, id: Uuid, kind: Announce) {
    let target = {
        let mut guard = shared.lock();
        let state = &mut *guard;
        match state.board.as_mut() {
            Some(board) if board.id() == id => match kind {
                Announce::NewTarget => board.choose_target(&mut state.rng),
                Announce::Repeat => board.begin_announcement(),
            },
            _ => return,
        }
    };
    let Some(target) = target else {
        return;
    };

    shared.set_phase(BoardPhase::Locked);
    shared.present(MemoryEvent::TargetAnnounced {
        target: target.clone(),
    });
    shared.speech.cancel_all();
    shared.speech.speak(&target, shared.voice());
    let spelled = timeout(
        shared.config.timings.speech_timeout,
        shared.speech.spell_out(&target, shared.voice()),
    )
    .await;
    if spelled.is_err() {
        tracing::warn!(%target, "spelling playback did not finish, unlocking anyway");
        shared.present(MemoryEvent::SpeechTimedOut {
            text: target.clone(),
        });
    }

    let opened = shared.with_board(id, |board| {
        board.announcement_finished();
        !board.is_locked()
    });
    if opened == Some(true) {
        shared.set_phase(BoardPhase::Ready);
        shared.present(MemoryEvent::Ready);
    }
}
