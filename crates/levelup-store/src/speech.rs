//! Speech backends.
//!
//! The terminal has no audio, so [`ConsoleSpeech`] prints what would be
//! said. [`MockSpeech`] records every call for tests and can simulate a
//! backend that never reports completion.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use levelup_core::traits::{spaced_letters, Speech};

/// Prints spoken text to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSpeech {
    /// Delay between letters when spelling out.
    letter_pace: Duration,
}

impl ConsoleSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_letter_pace(letter_pace: Duration) -> Self {
        Self { letter_pace }
    }

    fn say(text: &str, voice: Option<&str>) {
        match voice {
            Some(voice) => println!("🔊 [{voice}] {text}"),
            None => println!("🔊 {text}"),
        }
    }
}

#[async_trait]
impl Speech for ConsoleSpeech {
    fn speak(&self, text: &str, voice: Option<&str>) {
        Self::say(text, voice);
    }

    async fn speak_and_wait(&self, text: &str, voice: Option<&str>) {
        Self::say(text, voice);
    }

    async fn spell_out(&self, text: &str, voice: Option<&str>) {
        if !self.letter_pace.is_zero() {
            tokio::time::sleep(self.letter_pace * text.chars().count() as u32).await;
        }
        Self::say(&spaced_letters(text), voice);
    }

    fn cancel_all(&self) {}
}

/// Says nothing and completes immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeech;

#[async_trait]
impl Speech for SilentSpeech {
    fn speak(&self, _text: &str, _voice: Option<&str>) {}
    async fn speak_and_wait(&self, _text: &str, _voice: Option<&str>) {}
    async fn spell_out(&self, _text: &str, _voice: Option<&str>) {}
    fn cancel_all(&self) {}
}

/// One recorded call on a [`MockSpeech`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCall {
    Speak(String),
    SpeakAndWait(String),
    SpellOut(String),
    CancelAll,
}

/// Records calls; optionally never completes awaited playback.
#[derive(Debug, Default)]
pub struct MockSpeech {
    calls: Mutex<Vec<SpeechCall>>,
    hang: bool,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose awaited calls never resolve.
    pub fn hanging() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            hang: true,
        }
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Texts passed to `speak` and `speak_and_wait`, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SpeechCall::Speak(t) | SpeechCall::SpeakAndWait(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SpeechCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    async fn finish(&self) {
        if self.hang {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl Speech for MockSpeech {
    fn speak(&self, text: &str, _voice: Option<&str>) {
        self.record(SpeechCall::Speak(text.to_string()));
    }

    async fn speak_and_wait(&self, text: &str, _voice: Option<&str>) {
        self.record(SpeechCall::SpeakAndWait(text.to_string()));
        self.finish().await;
    }

    async fn spell_out(&self, text: &str, _voice: Option<&str>) {
        self.record(SpeechCall::SpellOut(text.to_string()));
        self.finish().await;
    }

    fn cancel_all(&self) {
        self.record(SpeechCall::CancelAll);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use levelup_core::game::{BoardPhase, MemoryConfig, MemoryGame};
    use levelup_core::model::Student;
    use levelup_core::traits::NoopPresenter;

    use super::*;

    #[tokio::test]
    async fn mock_records_in_order() {
        let speech = MockSpeech::new();
        speech.speak("cat", None);
        speech.cancel_all();
        speech.spell_out("cat", Some("en")).await;
        speech.speak_and_wait("done", None).await;
        assert_eq!(
            speech.calls(),
            vec![
                SpeechCall::Speak("cat".into()),
                SpeechCall::CancelAll,
                SpeechCall::SpellOut("cat".into()),
                SpeechCall::SpeakAndWait("done".into()),
            ]
        );
        assert_eq!(speech.spoken(), vec!["cat", "done"]);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_mock_is_bounded_by_timeout() {
        let speech = MockSpeech::hanging();
        let result =
            tokio::time::timeout(Duration::from_secs(6), speech.spell_out("cat", None)).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn memory_game_survives_hanging_backend() {
        let speech = Arc::new(MockSpeech::hanging());
        let game = MemoryGame::start(
            Student::default(),
            &["sun".to_string()],
            MemoryConfig::default(),
            speech.clone(),
            Arc::new(NoopPresenter),
        )
        .unwrap();
        assert_eq!(game.wait_ready().await, BoardPhase::Ready);
        assert!(speech.calls().contains(&SpeechCall::SpellOut("sun".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn console_speech_completes() {
        let speech = ConsoleSpeech::with_letter_pace(Duration::from_millis(100));
        speech.spell_out("sun", None).await;
        SilentSpeech.spell_out("sun", None).await;
    }
}
