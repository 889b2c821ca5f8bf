//! Keyword-driven answers to common tax questions.
//!
//! Matching is plain substring containment on the lower-cased message.
//! Keywords are tried in declaration order and the first hit wins, so a
//! message mentioning both "deduction" and "credit" always gets the
//! deduction answer.

mod answers;

pub use answers::{CANNED_ANSWERS, DEFAULT_KEY};

/// Stateless keyword-to-answer lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponder {
    entries: Vec<(String, String)>,
    default_answer: String,
}

impl ChatResponder {
    /// Builds a responder from `(keyword, answer)` pairs in match order.
    ///
    /// A pair keyed [`DEFAULT_KEY`] supplies the fallback answer and is never
    /// matched as a keyword. Empty keywords are dropped since they would
    /// match everything.
    pub fn from_pairs<K, A, I>(pairs: I) -> Self
    where
        K: Into<String>,
        A: Into<String>,
        I: IntoIterator<Item = (K, A)>,
    {
        let mut entries = Vec::new();
        let mut default_answer = String::new();

        for (keyword, answer) in pairs {
            let keyword = keyword.into().trim().to_lowercase();
            let answer = answer.into();
            if keyword == DEFAULT_KEY {
                default_answer = answer;
            } else if !keyword.is_empty() {
                entries.push((keyword, answer));
            }
        }

        Self {
            entries,
            default_answer,
        }
    }

    pub fn respond(
        &self,
        message: &str,
    ) -> &str {
        let message = message.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| message.contains(keyword.as_str()))
            .map_or(self.default_answer.as_str(), |(keyword, answer)| {
                tracing::debug!(%keyword, "chat keyword matched");
                answer.as_str()
            })
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(keyword, _)| keyword.as_str())
    }

    pub fn default_answer(&self) -> &str {
        &self.default_answer
    }
}

impl Default for ChatResponder {
    fn default() -> Self {
        Self::from_pairs(CANNED_ANSWERS.iter().copied())
    }
}

/// Answers `message` from the built-in table.
pub fn respond(message: &str) -> String {
    ChatResponder::default().respond(message).to_string()
}
