//! Core data model types for levelup.
//!
//! `AppData` is the whole persisted document: every student with their
//! lists, history, XP, medals and weekly goal counters. Missing fields are
//! filled by serde defaults when a snapshot is read, and [`AppData::normalize`]
//! runs once after loading so nothing downstream re-checks them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};

/// Default number of correct answers per week that counts as a met goal.
pub const DEFAULT_WEEKLY_GOAL: u32 = 10;

/// Default accent color for new students.
pub const DEFAULT_COLOR: &str = "#4ECDC4";

/// Default avatar for new students.
pub const DEFAULT_EMOJI: &str = "🦁";

/// Default title shown on a student's portal.
pub const DEFAULT_ROLE: &str = "Hero";

/// The entire persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    /// Students keyed by display name.
    #[serde(default)]
    pub students: BTreeMap<String, Student>,
    /// App-wide settings.
    #[serde(default)]
    pub config: AppConfig,
}

/// App-wide settings stored alongside the students.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Preferred speech voice identifier.
    #[serde(default, alias = "voiceURI")]
    pub voice_id: Option<String>,
}

/// A learner and everything they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Word lists keyed by list name.
    #[serde(default)]
    pub lists: BTreeMap<String, WordList>,
    /// Per-word attempt history.
    #[serde(default)]
    pub history: BTreeMap<String, WordHistory>,
    /// Experience points.
    #[serde(default)]
    pub xp: u64,
    /// Lifetime medal tally.
    #[serde(default)]
    pub medals: Medals,
    /// Correct answers per week that count as a met goal.
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal: u32,
    /// Correct answers so far this week.
    #[serde(default)]
    pub weekly_progress: u32,
    /// Dates (`YYYY-MM-DD`) on which the weekly goal was reached.
    #[serde(default)]
    pub goal_history: Vec<String>,
    /// Day streak shown on the portal.
    #[serde(default)]
    pub streak: u32,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
}

fn default_weekly_goal() -> u32 {
    DEFAULT_WEEKLY_GOAL
}
fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}
fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}
fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

impl Default for Student {
    fn default() -> Self {
        Self {
            lists: BTreeMap::new(),
            history: BTreeMap::new(),
            xp: 0,
            medals: Medals::default(),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            weekly_progress: 0,
            goal_history: Vec::new(),
            streak: 0,
            role: default_role(),
            color: default_color(),
            emoji: default_emoji(),
        }
    }
}

/// A named quest: ordered words plus a parallel, possibly shorter, list of
/// example sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub sentences: Vec<String>,
    /// Archived lists are kept but excluded from "all lists" sessions.
    #[serde(default)]
    pub hidden: bool,
}

impl WordList {
    pub fn new(words: Vec<String>, sentences: Vec<String>) -> Self {
        Self {
            words: normalize_words(words),
            sentences: normalize_sentences(sentences),
            hidden: false,
        }
    }

    /// The sentence paired with the word at `index`, or `""`.
    pub fn sentence_for(&self, index: usize) -> &str {
        self.sentences.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Attempt history for a single word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordHistory {
    /// Wrong guesses recorded for this word.
    #[serde(default)]
    pub missed: u32,
    /// Seconds taken for each correct answer.
    #[serde(default)]
    pub times: Vec<f64>,
    /// Dates (`YYYY-MM-DD`) of each correct answer.
    #[serde(default)]
    pub dates: Vec<String>,
}

/// Speed tier of a correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Medal::Gold => write!(f, "gold"),
            Medal::Silver => write!(f, "silver"),
            Medal::Bronze => write!(f, "bronze"),
        }
    }
}

impl FromStr for Medal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gold" => Ok(Medal::Gold),
            "silver" => Ok(Medal::Silver),
            "bronze" => Ok(Medal::Bronze),
            other => Err(format!("unknown medal: {other}")),
        }
    }
}

/// A gold/silver/bronze tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medals {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
}

impl Medals {
    pub fn award(&mut self, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
        }
    }

    pub fn add(&mut self, other: &Medals) {
        self.gold += other.gold;
        self.silver += other.silver;
        self.bronze += other.bronze;
    }

    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }
}

/// Split comma-separated input into trimmed, lowercased, non-empty words.
pub fn parse_word_input(input: &str) -> Vec<String> {
    normalize_words(input.split(',').map(str::to_string).collect())
}

/// Split comma-separated input into trimmed, non-empty sentences.
pub fn parse_sentence_input(input: &str) -> Vec<String> {
    normalize_sentences(input.split(',').map(str::to_string).collect())
}

fn normalize_words(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn normalize_sentences(sentences: Vec<String>) -> Vec<String> {
    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppData {
    /// Bring a freshly deserialized document up to the invariants the
    /// engines rely on: canonical lowercase words, a non-zero weekly goal,
    /// non-empty cosmetics, and no blank or duplicate goal dates.
    pub fn normalize(&mut self) {
        for student in self.students.values_mut() {
            if student.weekly_goal == 0 {
                student.weekly_goal = DEFAULT_WEEKLY_GOAL;
            }
            if student.role.trim().is_empty() {
                student.role = default_role();
            }
            if student.color.trim().is_empty() {
                student.color = default_color();
            }
            if student.emoji.trim().is_empty() {
                student.emoji = default_emoji();
            }
            for list in student.lists.values_mut() {
                list.words = normalize_words(std::mem::take(&mut list.words));
            }
            let mut seen = Vec::with_capacity(student.goal_history.len());
            student.goal_history.retain(|d| {
                if d.trim().is_empty() || seen.contains(d) {
                    false
                } else {
                    seen.push(d.clone());
                    true
                }
            });
        }
    }

    pub fn student(&self, name: &str) -> Result<&Student> {
        self.students
            .get(name)
            .ok_or_else(|| QuestError::UnknownStudent(name.to_string()))
    }

    pub fn student_mut(&mut self, name: &str) -> Result<&mut Student> {
        self.students
            .get_mut(name)
            .ok_or_else(|| QuestError::UnknownStudent(name.to_string()))
    }

    /// Add a new student with default settings. Returns the trimmed name.
    pub fn add_student(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuestError::EmptyName("student name"));
        }
        if self.students.contains_key(name) {
            return Err(QuestError::DuplicateStudent(name.to_string()));
        }
        self.students.insert(name.to_string(), Student::default());
        tracing::info!(student = name, "added student");
        Ok(name.to_string())
    }

    pub fn remove_student(&mut self, name: &str) -> Result<Student> {
        self.students
            .remove(name)
            .ok_or_else(|| QuestError::UnknownStudent(name.to_string()))
    }

    /// Students ordered by XP, highest first; ties by name.
    pub fn leaderboard(&self) -> Vec<(&str, &Student)> {
        let mut ranked: Vec<(&str, &Student)> = self
            .students
            .iter()
            .map(|(name, s)| (name.as_str(), s))
            .collect();
        ranked.sort_by(|a, b| b.1.xp.cmp(&a.1.xp).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl Student {
    pub fn list(&self, list: &str) -> Result<&WordList> {
        self.lists
            .get(list)
            .ok_or_else(|| QuestError::UnknownList(list.to_string()))
    }

    /// Create an empty list, or leave an existing one untouched.
    pub fn create_list(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuestError::EmptyName("list name"));
        }
        self.lists.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Replace a list's words from comma-separated input.
    pub fn set_words(&mut self, list: &str, input: &str) -> Result<()> {
        let entry = self.list_mut(list)?;
        entry.words = parse_word_input(input);
        Ok(())
    }

    /// Replace a list's sentences from comma-separated input.
    pub fn set_sentences(&mut self, list: &str, input: &str) -> Result<()> {
        let entry = self.list_mut(list)?;
        entry.sentences = parse_sentence_input(input);
        Ok(())
    }

    /// Flip a list between archived and visible. Returns the new hidden flag.
    pub fn toggle_hidden(&mut self, list: &str) -> Result<bool> {
        let entry = self.list_mut(list)?;
        entry.hidden = !entry.hidden;
        Ok(entry.hidden)
    }

    pub fn delete_list(&mut self, list: &str) -> Result<WordList> {
        self.lists
            .remove(list)
            .ok_or_else(|| QuestError::UnknownList(list.to_string()))
    }

    /// Names of lists not marked hidden.
    pub fn visible_lists(&self) -> impl Iterator<Item = &str> {
        self.lists
            .iter()
            .filter(|(_, l)| !l.hidden)
            .map(|(name, _)| name.as_str())
    }

    /// Set the weekly goal. Zero falls back to the default.
    pub fn set_weekly_goal(&mut self, goal: u32) {
        self.weekly_goal = if goal == 0 { DEFAULT_WEEKLY_GOAL } else { goal };
    }

    pub fn reset_medals(&mut self) {
        self.medals = Medals::default();
    }

    /// Wipe XP, history, goal log, streak and weekly progress.
    pub fn reset_progress(&mut self) {
        self.xp = 0;
        self.history.clear();
        self.goal_history.clear();
        self.streak = 0;
        self.weekly_progress = 0;
    }

    pub fn reset_lists(&mut self) {
        self.lists.clear();
    }

    /// Week boundary rollover; the only way weekly progress goes down.
    pub fn start_new_week(&mut self) {
        self.weekly_progress = 0;
    }

    fn list_mut(&mut self, list: &str) -> Result<&mut WordList> {
        self.lists
            .get_mut(list)
            .ok_or_else(|| QuestError::UnknownList(list.to_string()))
    }
}
