//! Progress ledger: how session outcomes change a student record.
//!
//! Both engines report outcomes; the functions here are the only place XP,
//! weekly progress, goal milestones, word history and lifetime medals are
//! mutated.

use chrono::NaiveDate;

use crate::model::{Medals, Student};
use crate::spelling::GuessOutcome;

/// XP for a correct spelling with no wrong guesses on that word.
pub const XP_FIRST_TRY: u64 = 30;

/// XP for a correct spelling after at least one wrong guess.
pub const XP_CORRECT: u64 = 20;

/// XP for a credited memory match.
pub const XP_MEMORY_MATCH: u64 = 5;

/// XP for clearing a memory board.
pub const XP_MEMORY_WIN: u64 = 50;

/// Canonical `YYYY-MM-DD` form used for goal and history dates.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// What a single ledger update changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerUpdate {
    pub xp_awarded: u64,
    /// The weekly goal was reached by this update.
    pub goal_reached: bool,
}

/// Count one unit of weekly progress. When progress lands exactly on the
/// goal, `today` is appended to the goal history unless already present.
///
/// Returns `true` if the goal was reached by this call.
pub fn bump_weekly_progress(student: &mut Student, today: NaiveDate) -> bool {
    student.weekly_progress += 1;
    if student.weekly_progress != student.weekly_goal {
        return false;
    }
    let key = date_key(today);
    if !student.goal_history.contains(&key) {
        student.goal_history.push(key.clone());
    }
    tracing::info!(date = %key, goal = student.weekly_goal, "weekly goal reached");
    true
}

/// Apply a spelling guess outcome for `target`.
///
/// Correct answers award XP, count toward the weekly goal and log the time
/// taken; wrong guesses (including the one that forces a reveal) count as a
/// miss for the word. Other outcomes change nothing.
pub fn record_guess(
    student: &mut Student,
    target: &str,
    outcome: &GuessOutcome,
    today: NaiveDate,
) -> LedgerUpdate {
    match outcome {
        GuessOutcome::Correct {
            word,
            elapsed,
            first_try,
            ..
        } => {
            let xp = if *first_try { XP_FIRST_TRY } else { XP_CORRECT };
            student.xp += xp;
            let goal_reached = bump_weekly_progress(student, today);
            let entry = student.history.entry(word.clone()).or_default();
            entry.times.push(elapsed.as_secs_f64());
            entry.dates.push(date_key(today));
            LedgerUpdate {
                xp_awarded: xp,
                goal_reached,
            }
        }
        GuessOutcome::Incorrect { .. } | GuessOutcome::Reveal { .. } => {
            record_miss(student, target);
            LedgerUpdate::default()
        }
        _ => LedgerUpdate::default(),
    }
}

/// Count a wrong guess against `word`.
pub fn record_miss(student: &mut Student, word: &str) {
    student.history.entry(word.to_string()).or_default().missed += 1;
}

/// Fold a finished session's medals into the lifetime tally.
pub fn record_session_complete(student: &mut Student, session_medals: &Medals) {
    student.medals.add(session_medals);
    tracing::info!(
        gold = session_medals.gold,
        silver = session_medals.silver,
        bronze = session_medals.bronze,
        "session medals banked"
    );
}

/// A credited memory match.
pub fn record_memory_match(student: &mut Student) -> LedgerUpdate {
    student.xp += XP_MEMORY_MATCH;
    LedgerUpdate {
        xp_awarded: XP_MEMORY_MATCH,
        goal_reached: false,
    }
}

/// A cleared memory board: one gold medal, bonus XP and a unit of weekly
/// progress.
pub fn record_memory_win(student: &mut Student, today: NaiveDate) -> LedgerUpdate {
    student.medals.gold += 1;
    student.xp += XP_MEMORY_WIN;
    let goal_reached = bump_weekly_progress(student, today);
    LedgerUpdate {
        xp_awarded: XP_MEMORY_WIN,
        goal_reached,
    }
}
