//! Derived progress figures for reports.

use serde::Serialize;

use crate::model::{Medals, Student, WordHistory};

/// XP per level step.
pub const XP_PER_LEVEL: u64 = 100;

/// Accuracy lost per recorded miss.
pub const MISS_PENALTY: u32 = 10;

/// Per-word figures derived from [`WordHistory`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordStats {
    pub word: String,
    /// Mean seconds over correct answers; `None` if never answered.
    pub average_secs: Option<f64>,
    /// `100 - missed * 10`, floored at zero.
    pub accuracy: u32,
    pub correct: usize,
    pub missed: u32,
    pub last_practiced: Option<String>,
}

impl WordStats {
    pub fn from_history(word: &str, history: &WordHistory) -> Self {
        let average_secs = if history.times.is_empty() {
            None
        } else {
            Some(history.times.iter().sum::<f64>() / history.times.len() as f64)
        };
        Self {
            word: word.to_string(),
            average_secs,
            accuracy: accuracy(history.missed),
            correct: history.times.len(),
            missed: history.missed,
            last_practiced: history.dates.last().cloned(),
        }
    }
}

pub fn accuracy(missed: u32) -> u32 {
    100u32.saturating_sub(missed.saturating_mul(MISS_PENALTY))
}

/// `floor(sqrt(xp / 100)) + 1`.
pub fn level(xp: u64) -> u32 {
    let steps = xp / XP_PER_LEVEL;
    // Integer square root; f64 is exact for any realistic XP total.
    let mut root = (steps as f64).sqrt() as u64;
    while root * root > steps {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= steps {
        root += 1;
    }
    root as u32 + 1
}

/// Summary shown on a student's report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub xp: u64,
    pub level: u32,
    /// Percent toward the next level bar (`xp % 100`).
    pub level_progress: u64,
    pub medals: Medals,
    pub weekly_goal: u32,
    pub weekly_progress: u32,
    /// Weekly progress as a percentage of the goal, capped at 100.
    pub goal_percent: u32,
    /// Number of dates on which the weekly goal was reached.
    pub goal_streak: usize,
    pub words: Vec<WordStats>,
}

pub fn summarize(student: &Student) -> StudentSummary {
    let goal_percent = if student.weekly_goal == 0 {
        0
    } else {
        (student.weekly_progress.saturating_mul(100) / student.weekly_goal).min(100)
    };
    StudentSummary {
        xp: student.xp,
        level: level(student.xp),
        level_progress: student.xp % XP_PER_LEVEL,
        medals: student.medals,
        weekly_goal: student.weekly_goal,
        weekly_progress: student.weekly_progress,
        goal_percent,
        goal_streak: student.goal_history.len(),
        words: student
            .history
            .iter()
            .map(|(word, h)| WordStats::from_history(word, h))
            .collect(),
    }
}

/// Words with the lowest accuracy first, then the slowest.
pub fn trouble_words(summary: &StudentSummary, limit: usize) -> Vec<&WordStats> {
    let mut words: Vec<&WordStats> = summary.words.iter().filter(|w| w.missed > 0).collect();
    words.sort_by(|a, b| {
        a.accuracy.cmp(&b.accuracy).then_with(|| {
            b.average_secs
                .unwrap_or(0.0)
                .total_cmp(&a.average_secs.unwrap_or(0.0))
        })
    });
    words.truncate(limit);
    words
}
