//! Memory match board.
//!
//! A deck of up to [`MAX_PAIRS`] word pairs is laid face down. One remaining
//! word is announced as the current target, and only a pair of that word is
//! credited. Matching any other pair is rejected and both cards turn back.
//!
//! The board is a synchronous state machine. Anything that takes time
//! (feedback delays, speech) happens between calls while the board stays
//! locked; see [`crate::game::MemoryGame`] for the driver.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::{QuestError, Result};

/// Most distinct words placed on one board.
pub const MAX_PAIRS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    FaceDown,
    Flipped,
    Matched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub word: String,
    pub state: CardState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    Playing,
    Won,
}

/// Result of selecting a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Locked board, finished game, unknown index, a matched card, or the
    /// card that is already face up.
    Ignored,
    /// First card of a pair turned over; the board stays open.
    FirstFlipped { card: usize, word: String },
    /// The pair matches the announced target and is credited.
    TargetMatch {
        word: String,
        matches_found: usize,
        total_pairs: usize,
        won: bool,
    },
    /// The pair matches but is not the announced target.
    NonTargetMatch { word: String, target: String },
    /// The two cards differ.
    Mismatch {
        first: String,
        second: String,
        target: String,
    },
}

/// What must happen after a pair has been shown long enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settle {
    /// Nothing was pending.
    Idle,
    /// A target was matched; pick and announce a new one.
    NextTarget,
    /// The pair was rejected; announce the same target again.
    Reannounce { target: String },
    /// The last pair was matched.
    Won,
}

/// The doubled, shuffled deck plus forced-target bookkeeping.
#[derive(Debug, Clone)]
pub struct MemoryBoard {
    id: Uuid,
    cards: Vec<Card>,
    remaining_targets: Vec<String>,
    current_target: Option<String>,
    first: Option<usize>,
    second: Option<usize>,
    locked: bool,
    matches_found: usize,
    total_pairs: usize,
    status: BoardStatus,
}

impl MemoryBoard {
    /// Deduplicate `words`, sample at most [`MAX_PAIRS`] of them, and deal a
    /// shuffled deck holding each chosen word twice.
    ///
    /// The board starts locked; it opens once the first target has been
    /// announced.
    pub fn new<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Result<Self> {
        let mut unique: Vec<String> = Vec::new();
        for word in words {
            let word = word.trim().to_lowercase();
            if !word.is_empty() && !unique.contains(&word) {
                unique.push(word);
            }
        }
        if unique.is_empty() {
            return Err(QuestError::NoWords {
                list: "memory board".to_string(),
            });
        }
        if unique.len() > MAX_PAIRS {
            unique.shuffle(rng);
            unique.truncate(MAX_PAIRS);
        }

        let mut cards: Vec<Card> = unique
            .iter()
            .chain(unique.iter())
            .map(|w| Card {
                word: w.clone(),
                state: CardState::FaceDown,
            })
            .collect();
        cards.shuffle(rng);

        let id = Uuid::new_v4();
        tracing::debug!(board = %id, pairs = unique.len(), "memory board dealt");
        Ok(Self {
            id,
            cards,
            total_pairs: unique.len(),
            remaining_targets: unique,
            current_target: None,
            first: None,
            second: None,
            locked: true,
            matches_found: 0,
            status: BoardStatus::Playing,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn remaining_targets(&self) -> &[String] {
        &self.remaining_targets
    }

    pub fn current_target(&self) -> Option<&str> {
        self.current_target.as_deref()
    }

    pub fn matches_found(&self) -> usize {
        self.matches_found
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock the board and pick a new target uniformly from the remaining
    /// words. Returns `None` when every target has been matched.
    pub fn choose_target<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        self.locked = true;
        let target = self.remaining_targets.choose(rng).cloned();
        self.current_target = target.clone();
        target
    }

    /// Lock the board while the current target is announced again.
    pub fn begin_announcement(&mut self) -> Option<String> {
        self.locked = true;
        self.current_target.clone()
    }

    /// The announcement has played (or timed out); open the board.
    pub fn announcement_finished(&mut self) {
        if self.status == BoardStatus::Playing && self.second.is_none() {
            self.locked = false;
        }
    }

    /// Select a card.
    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.locked || self.status == BoardStatus::Won || self.first == Some(index) {
            return FlipOutcome::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if card.state == CardState::FaceDown => {}
            _ => return FlipOutcome::Ignored,
        }
        self.cards[index].state = CardState::Flipped;

        let Some(first) = self.first else {
            self.first = Some(index);
            return FlipOutcome::FirstFlipped {
                card: index,
                word: self.cards[index].word.clone(),
            };
        };

        self.second = Some(index);
        self.locked = true;
        self.evaluate_pair(first, index)
    }

    fn evaluate_pair(&mut self, first: usize, second: usize) -> FlipOutcome {
        let first_word = self.cards[first].word.clone();
        let second_word = self.cards[second].word.clone();
        let target = self.current_target.clone().unwrap_or_default();

        if first_word != second_word {
            return FlipOutcome::Mismatch {
                first: first_word,
                second: second_word,
                target,
            };
        }
        if first_word != target {
            tracing::debug!(board = %self.id, found = %first_word, %target, "non-target match rejected");
            return FlipOutcome::NonTargetMatch {
                word: first_word,
                target,
            };
        }

        self.cards[first].state = CardState::Matched;
        self.cards[second].state = CardState::Matched;
        self.remaining_targets.retain(|w| *w != first_word);
        self.matches_found += 1;
        let won = self.matches_found == self.total_pairs;
        if won {
            self.status = BoardStatus::Won;
        }
        tracing::debug!(board = %self.id, word = %first_word, matches = self.matches_found, "target matched");
        FlipOutcome::TargetMatch {
            word: first_word,
            matches_found: self.matches_found,
            total_pairs: self.total_pairs,
            won,
        }
    }

    /// Finish a pending pair: unmatched cards turn face down and the
    /// selection slots clear. The board stays locked; the caller must
    /// announce a target (new or repeated) to open it again.
    pub fn settle(&mut self) -> Settle {
        let (Some(first), Some(second)) = (self.first, self.second) else {
            return Settle::Idle;
        };
        self.first = None;
        self.second = None;

        if self.status == BoardStatus::Won {
            return Settle::Won;
        }
        let matched = self.cards[first].state == CardState::Matched;
        for index in [first, second] {
            if self.cards[index].state == CardState::Flipped {
                self.cards[index].state = CardState::FaceDown;
            }
        }
        if matched {
            Settle::NextTarget
        } else {
            Settle::Reannounce {
                target: self.current_target.clone().unwrap_or_default(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn open_board(list: &[&str], seed: u64) -> (MemoryBoard, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = MemoryBoard::new(&words(list), &mut rng).unwrap();
        board.choose_target(&mut rng);
        board.announcement_finished();
        (board, rng)
    }

    fn positions(board: &MemoryBoard, word: &str) -> Vec<usize> {
        board
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.word == word)
            .map(|(i, _)| i)
            .collect()
    }

    /// Force a known target by re-choosing until it comes up.
    fn set_target(board: &mut MemoryBoard, rng: &mut ChaCha8Rng, want: &str) {
        while board.choose_target(rng).as_deref() != Some(want) {}
        board.announcement_finished();
    }

    #[test]
    fn deck_holds_each_word_twice() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let board = MemoryBoard::new(&words(&["sun", "Moon", "sun", " star "]), &mut rng).unwrap();
        assert_eq!(board.total_pairs(), 3);
        assert_eq!(board.cards().len(), 6);
        for w in ["sun", "moon", "star"] {
            assert_eq!(positions(&board, w).len(), 2);
        }
        assert!(board.is_locked());
    }

    #[test]
    fn large_lists_are_sampled_to_six() {
        let list: Vec<String> = (0..10).map(|i| format!("w{i}")).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let board = MemoryBoard::new(&list, &mut rng).unwrap();
        assert_eq!(board.total_pairs(), MAX_PAIRS);
        assert_eq!(board.cards().len(), 12);
        assert_eq!(board.remaining_targets().len(), 6);
        for w in board.remaining_targets() {
            assert!(list.contains(w));
        }
    }

    #[test]
    fn empty_words_refused() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(MemoryBoard::new(&words(&["", "  "]), &mut rng).is_err());
    }

    #[test]
    fn locked_board_ignores_flips() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut board = MemoryBoard::new(&words(&["sun"]), &mut rng).unwrap();
        assert_eq!(board.flip(0), FlipOutcome::Ignored);
        board.choose_target(&mut rng);
        assert_eq!(board.flip(0), FlipOutcome::Ignored);
        board.announcement_finished();
        assert!(matches!(board.flip(0), FlipOutcome::FirstFlipped { .. }));
    }

    #[test]
    fn same_card_twice_is_ignored() {
        let (mut board, _) = open_board(&["sun", "moon"], 5);
        assert!(matches!(board.flip(2), FlipOutcome::FirstFlipped { card: 2, .. }));
        assert_eq!(board.flip(2), FlipOutcome::Ignored);
        assert!(!board.is_locked());
        assert_eq!(board.flip(99), FlipOutcome::Ignored);
    }

    #[test]
    fn non_target_match_is_rejected() {
        let (mut board, mut rng) = open_board(&["sun", "moon"], 1);
        set_target(&mut board, &mut rng, "moon");
        let suns = positions(&board, "sun");

        board.flip(suns[0]);
        let outcome = board.flip(suns[1]);
        assert_eq!(
            outcome,
            FlipOutcome::NonTargetMatch {
                word: "sun".into(),
                target: "moon".into()
            }
        );
        assert_eq!(board.matches_found(), 0);
        assert!(board.is_locked());

        assert_eq!(
            board.settle(),
            Settle::Reannounce {
                target: "moon".into()
            }
        );
        assert!(board.remaining_targets().contains(&"moon".to_string()));
        assert!(board.remaining_targets().contains(&"sun".to_string()));
        assert!(board
            .cards()
            .iter()
            .all(|c| c.state == CardState::FaceDown));
        assert!(board.is_locked());

        board.begin_announcement();
        board.announcement_finished();
        assert!(!board.is_locked());
        assert_eq!(board.current_target(), Some("moon"));
    }

    #[test]
    fn mismatch_turns_cards_back() {
        let (mut board, _) = open_board(&["sun", "moon"], 2);
        let sun = positions(&board, "sun")[0];
        let moon = positions(&board, "moon")[0];
        board.flip(sun);
        assert!(matches!(board.flip(moon), FlipOutcome::Mismatch { .. }));
        assert!(matches!(board.settle(), Settle::Reannounce { .. }));
        assert_eq!(board.cards()[sun].state, CardState::FaceDown);
        assert_eq!(board.cards()[moon].state, CardState::FaceDown);
    }

    #[test]
    fn target_match_then_win() {
        let (mut board, mut rng) = open_board(&["sun", "moon"], 9);
        set_target(&mut board, &mut rng, "sun");
        let suns = positions(&board, "sun");
        board.flip(suns[0]);
        let outcome = board.flip(suns[1]);
        assert_eq!(
            outcome,
            FlipOutcome::TargetMatch {
                word: "sun".into(),
                matches_found: 1,
                total_pairs: 2,
                won: false
            }
        );
        assert_eq!(board.remaining_targets(), &["moon".to_string()]);
        assert_eq!(board.settle(), Settle::NextTarget);

        // Matched cards can no longer be selected.
        assert_eq!(board.choose_target(&mut rng).as_deref(), Some("moon"));
        board.announcement_finished();
        assert_eq!(board.flip(suns[0]), FlipOutcome::Ignored);

        let moons = positions(&board, "moon");
        board.flip(moons[0]);
        assert!(matches!(
            board.flip(moons[1]),
            FlipOutcome::TargetMatch { won: true, .. }
        ));
        assert_eq!(board.status(), BoardStatus::Won);
        assert_eq!(board.settle(), Settle::Won);
        board.announcement_finished();
        assert!(board.is_locked());
        assert!(board.choose_target(&mut rng).is_none());
    }

    #[test]
    fn only_target_pairs_are_credited_for_any_shuffle() {
        for seed in 0..25 {
            let (mut board, mut rng) = open_board(&["a", "b", "c"], seed);
            let target = board.current_target().unwrap().to_string();
            for word in ["a", "b", "c"] {
                let pos = positions(&board, word);
                board.flip(pos[0]);
                let outcome = board.flip(pos[1]);
                if word == target {
                    assert!(matches!(outcome, FlipOutcome::TargetMatch { .. }));
                    assert_eq!(board.matches_found(), 1);
                } else {
                    assert!(matches!(outcome, FlipOutcome::NonTargetMatch { .. }));
                }
                board.settle();
                if board.current_target() == Some(word) && word == target {
                    board.choose_target(&mut rng);
                } else {
                    board.begin_announcement();
                }
                board.announcement_finished();
                if word == target {
                    break;
                }
            }
            assert_eq!(board.matches_found(), 1);
            assert!(!board.remaining_targets().contains(&target));
        }
    }

    #[test]
    fn settle_without_pending_pair_is_idle() {
        let (mut board, _) = open_board(&["sun"], 0);
        assert_eq!(board.settle(), Settle::Idle);
        board.flip(0);
        assert_eq!(board.settle(), Settle::Idle);
    }
}
