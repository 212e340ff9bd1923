//! Collaborator traits: storage, speech, and presentation.
//!
//! The engines never touch files, audio, or the screen directly. Concrete
//! implementations live in `levelup-store` and the CLI.

use async_trait::async_trait;

use crate::game::MemoryEvent;
use crate::spelling::GuessOutcome;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Key-value style persistence for the serialized [`AppData`] snapshot.
///
/// [`AppData`]: crate::model::AppData
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> anyhow::Result<Option<String>>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &str) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

/// Text-to-speech playback.
///
/// The awaited methods resolve when playback finishes. Callers always race
/// them against a timeout, so an implementation that never signals
/// completion cannot stall a game.
#[async_trait]
pub trait Speech: Send + Sync {
    /// Queue `text` without waiting for it to finish.
    fn speak(&self, text: &str, voice: Option<&str>);

    /// Speak `text` and resolve when playback ends.
    async fn speak_and_wait(&self, text: &str, voice: Option<&str>);

    /// Spell `text` letter by letter and resolve when playback ends.
    async fn spell_out(&self, text: &str, voice: Option<&str>);

    /// Stop current and queued playback.
    fn cancel_all(&self);
}

/// `"cat"` → `"c a t"`, the form spoken when spelling a word out.
pub fn spaced_letters(word: &str) -> String {
    word.chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Receives engine outcomes for rendering.
pub trait Presenter: Send + Sync {
    fn on_guess(&self, word: &str, outcome: &GuessOutcome);
    fn on_memory_event(&self, event: &MemoryEvent);
}

/// Presenter that discards everything.
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn on_guess(&self, _: &str, _: &GuessOutcome) {}
    fn on_memory_event(&self, _: &MemoryEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_spaced() {
        assert_eq!(spaced_letters("cat"), "c a t");
        assert_eq!(spaced_letters("a"), "a");
        assert_eq!(spaced_letters(""), "");
    }
}
