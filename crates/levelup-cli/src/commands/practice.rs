//! The `levelup practice` command: an interactive spelling round.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, timeout};

use levelup_core::ledger;
use levelup_core::phonetics::phonetic_chunks;
use levelup_core::spelling::{GuessOutcome, SpellingSession};
use levelup_core::traits::{Presenter, Speech};
use levelup_core::wordlist::{build_session_words, ListSelector};
use levelup_store::ConsoleSpeech;

use super::Context;
use crate::console::{medal_line, ConsolePresenter};

/// Say the current word and its sentence, then restart its timer.
fn announce(session: &mut SpellingSession, speech: &dyn Speech, voice: Option<&str>) {
    let Some(entry) = session.current() else {
        return;
    };
    println!("\nWord {} of {}", session.index() + 1, session.len());
    speech.cancel_all();
    speech.speak(&entry.word, voice);
    if !entry.sentence.is_empty() {
        speech.speak(&entry.sentence, voice);
    }
    session.restart_word_timer();
}

pub async fn execute(
    ctx: &Context,
    name: String,
    list: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let mut data = ctx.load_data()?;
    let selector = ListSelector::from_option(list.as_deref());
    let mut rng = ctx.rng(seed);
    let words = build_session_words(data.student(&name)?, &selector, &mut rng)?;
    let mut session = SpellingSession::new(words)?;

    let voice = ctx.voice(&data);
    let voice = voice.as_deref();
    let timings = &ctx.config.timings;
    let speech = ConsoleSpeech::new();
    let presenter = ConsolePresenter;

    println!("📚 Quest: {selector} ({} words)", session.len());
    println!("Type the word you hear. Commands: :repeat :help :pause :quit");
    announce(&mut session, &speech, voice);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            ":quit" => break,
            ":pause" => {
                if session.toggle_pause() {
                    speech.cancel_all();
                    println!("⏸  Paused. Type :pause to resume.");
                } else {
                    println!("▶  Resumed.");
                    announce(&mut session, &speech, voice);
                }
                continue;
            }
            ":repeat" => {
                if !session.is_paused() {
                    if let Some(entry) = session.current() {
                        speech.speak(&entry.word, voice);
                    }
                }
                continue;
            }
            ":help" => {
                if !session.is_paused() {
                    if let Some(entry) = session.current() {
                        speech.cancel_all();
                        for chunk in phonetic_chunks(&entry.word) {
                            speech.speak(&chunk, voice);
                        }
                    }
                }
                continue;
            }
            _ => {}
        }

        let Some(target) = session.current().map(|e| e.word.clone()) else {
            break;
        };
        let outcome = session.evaluate_guess(input);
        presenter.on_guess(&target, &outcome);

        let student = data.student_mut(&name)?;
        let update = ledger::record_guess(student, &target, &outcome, ledger::today());
        ctx.save_data(&data)?;
        if update.xp_awarded > 0 {
            println!("   +{} XP", update.xp_awarded);
        }
        if update.goal_reached {
            println!("🎉 Weekly goal reached!");
        }

        let delay = match &outcome {
            GuessOutcome::Correct { .. } => {
                speech.speak("Correct!", voice);
                timings.correct_delay()
            }
            GuessOutcome::Reveal { word, .. } => {
                speech.cancel_all();
                if timeout(timings.speech_timeout(), speech.spell_out(word, voice))
                    .await
                    .is_err()
                {
                    tracing::warn!(%word, "spelling playback did not finish");
                }
                timings.reveal_delay()
            }
            _ => continue,
        };

        if outcome.is_session_complete() {
            break;
        }
        sleep(delay).await;
        if session.advance().is_none() {
            break;
        }
        announce(&mut session, &speech, voice);
    }

    if session.is_complete() {
        let medals = session.medals();
        ledger::record_session_complete(data.student_mut(&name)?, &medals);
        ctx.save_data(&data)?;
        println!("\n🏁 Quest complete! {}", medal_line(&medals));
    } else {
        println!("\nSee you next time!");
    }
    Ok(())
}
