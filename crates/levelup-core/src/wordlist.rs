//! Session word sequences built from a student's lists.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{QuestError, Result};
use crate::model::Student;

/// A single practice item: the target word and its example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Lowercase, trimmed target spelling.
    pub word: String,
    /// Example sentence, empty when the list has none for this word.
    #[serde(default)]
    pub sentence: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, sentence: impl Into<String>) -> Self {
        Self {
            word: word.into().trim().to_lowercase(),
            sentence: sentence.into(),
        }
    }
}

/// Which lists feed a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSelector {
    /// One list by name, hidden or not.
    Named(String),
    /// Every list not marked hidden.
    All,
}

impl ListSelector {
    /// `None` selects every visible list.
    pub fn from_option(name: Option<&str>) -> Self {
        match name {
            Some(n) => ListSelector::Named(n.to_string()),
            None => ListSelector::All,
        }
    }
}

impl fmt::Display for ListSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListSelector::Named(name) => write!(f, "{name}"),
            ListSelector::All => write!(f, "all lists"),
        }
    }
}

/// Pair every selected word with its sentence, in list order.
pub fn collect_entries(student: &Student, selector: &ListSelector) -> Result<Vec<WordEntry>> {
    let mut entries = Vec::new();
    match selector {
        ListSelector::Named(name) => {
            let list = student.list(name)?;
            for (i, word) in list.words.iter().enumerate() {
                entries.push(WordEntry::new(word.as_str(), list.sentence_for(i)));
            }
        }
        ListSelector::All => {
            for list in student.lists.values().filter(|l| !l.hidden) {
                for (i, word) in list.words.iter().enumerate() {
                    entries.push(WordEntry::new(word.as_str(), list.sentence_for(i)));
                }
            }
        }
    }
    entries.retain(|e| !e.word.is_empty());
    Ok(entries)
}

/// Build the shuffled word sequence for a spelling session.
///
/// Fails with [`QuestError::NoWords`] when nothing is selected; no session
/// should be started in that case.
pub fn build_session_words<R: Rng + ?Sized>(
    student: &Student,
    selector: &ListSelector,
    rng: &mut R,
) -> Result<Vec<WordEntry>> {
    let mut entries = collect_entries(student, selector)?;
    if entries.is_empty() {
        return Err(QuestError::NoWords {
            list: selector.to_string(),
        });
    }
    entries.shuffle(rng);
    tracing::debug!(count = entries.len(), quest = %selector, "built session words");
    Ok(entries)
}

/// The raw words for a memory game, in list order, duplicates included.
pub fn collect_words(student: &Student, selector: &ListSelector) -> Result<Vec<String>> {
    let words: Vec<String> = collect_entries(student, selector)?
        .into_iter()
        .map(|e| e.word)
        .collect();
    if words.is_empty() {
        return Err(QuestError::NoWords {
            list: selector.to_string(),
        });
    }
    Ok(words)
}
