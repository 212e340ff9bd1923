//! Terminal rendering of engine outcomes.

use levelup_core::game::MemoryEvent;
use levelup_core::memory::{Card, CardState};
use levelup_core::model::{Medal, Medals};
use levelup_core::spelling::GuessOutcome;
use levelup_core::traits::Presenter;

/// Prints engine outcomes to stdout.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn on_guess(&self, word: &str, outcome: &GuessOutcome) {
        match outcome {
            GuessOutcome::Correct {
                elapsed,
                medal,
                first_try,
                ..
            } => {
                let note = if *first_try { " first try!" } else { "" };
                println!(
                    "✅ Correct! {} {medal} medal ({:.1}s){note}",
                    medal_icon(*medal),
                    elapsed.as_secs_f64()
                );
            }
            GuessOutcome::Incorrect {
                attempts_left,
                show_help,
            } => {
                println!("❌ Not quite. {attempts_left} tries left.");
                if *show_help {
                    println!("💡 Stuck? Type :help to sound it out.");
                }
            }
            GuessOutcome::Reveal { .. } => println!("📖 The word was: {word}"),
            GuessOutcome::Paused => println!("⏸  Paused. Type :pause to resume."),
            GuessOutcome::AwaitingAdvance => println!("Hold on, the next word is coming."),
            GuessOutcome::Complete => println!("This quest is finished."),
        }
    }

    fn on_memory_event(&self, event: &MemoryEvent) {
        match event {
            MemoryEvent::Dealt { cards, pairs } => {
                println!("🃏 Dealt {cards} cards ({pairs} pairs).")
            }
            MemoryEvent::TargetAnnounced { target } => println!("🎯 Find: {target}"),
            MemoryEvent::CardFlipped { card, word } => println!("   card {} is {word}", card + 1),
            MemoryEvent::Matched {
                word,
                matches_found,
                total_pairs,
                xp_awarded,
                praise,
            } => println!(
                "⭐ {praise} {word} matched ({matches_found}/{total_pairs}) +{xp_awarded} XP"
            ),
            MemoryEvent::Rejected { found, target } => {
                println!("🙈 That pair is {found}, but we need {target}.")
            }
            MemoryEvent::Mismatch { .. } => println!("↩  No match, try again."),
            MemoryEvent::CardsHidden | MemoryEvent::Ready => {}
            MemoryEvent::SpeechTimedOut { .. } => {}
            MemoryEvent::Won {
                xp_awarded,
                goal_reached,
            } => {
                println!("🏆 Board cleared! +{xp_awarded} XP and a gold medal.");
                if *goal_reached {
                    println!("🎉 Weekly goal reached!");
                }
            }
        }
    }
}

pub fn medal_icon(medal: Medal) -> &'static str {
    match medal {
        Medal::Gold => "🥇",
        Medal::Silver => "🥈",
        Medal::Bronze => "🥉",
    }
}

pub fn medal_line(medals: &Medals) -> String {
    format!(
        "🥇 {}  🥈 {}  🥉 {}",
        medals.gold, medals.silver, medals.bronze
    )
}

/// One line with every card: face-down cards as `?`, matched ones ticked.
pub fn render_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| match card.state {
            CardState::FaceDown => format!("[{} ?]", i + 1),
            CardState::Flipped => format!("[{} {}]", i + 1, card.word),
            CardState::Matched => format!("[{} ✓{}]", i + 1, card.word),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
