//! State for an interactive chat.
//!
//! The responder itself is stateless; the session only remembers what was
//! said so the transcript can be shown or saved at the end.

use serde::Serialize;
use tax_core::ChatResponder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// One conversation with the canned responder.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    responder: ChatResponder,
    transcript: Vec<Turn>,
}

impl ChatSession {
    pub fn new(responder: ChatResponder) -> Self {
        Self {
            responder,
            transcript: Vec::new(),
        }
    }

    /// Records `message`, answers it and records the answer.
    pub fn ask(
        &mut self,
        message: &str,
    ) -> &str {
        let answer = self.responder.respond(message).to_string();
        self.transcript.push(Turn {
            speaker: Speaker::User,
            text: message.to_string(),
        });
        self.transcript.push(Turn {
            speaker: Speaker::Bot,
            text: answer,
        });
        &self.transcript[self.transcript.len() - 1].text
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Number of questions asked so far.
    pub fn questions(&self) -> usize {
        self.transcript
            .iter()
            .filter(|turn| turn.speaker == Speaker::User)
            .count()
    }

    /// Forget the conversation, keeping the responder.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ask_records_both_sides() {
        let mut session = ChatSession::new(ChatResponder::from_pairs([
            ("refund", "Refunds take a few weeks."),
            ("default", "Ask me about refunds."),
        ]));

        let answer = session.ask("When is my REFUND coming?").to_string();

        assert_eq!(answer, "Refunds take a few weeks.");
        assert_eq!(
            session.transcript(),
            &[
                Turn {
                    speaker: Speaker::User,
                    text: "When is my REFUND coming?".to_string()
                },
                Turn {
                    speaker: Speaker::Bot,
                    text: "Refunds take a few weeks.".to_string()
                },
            ]
        );
    }

    #[test]
    fn unmatched_question_gets_default_answer() {
        let mut session = ChatSession::new(ChatResponder::from_pairs([
            ("refund", "Refunds take a few weeks."),
            ("default", "Ask me about refunds."),
        ]));

        assert_eq!(session.ask("what is the weather"), "Ask me about refunds.");
    }

    #[test]
    fn questions_counts_user_turns_and_clear_resets() {
        let mut session = ChatSession::default();
        session.ask("hello");
        session.ask("tell me about brackets");

        assert_eq!(session.questions(), 2);
        assert_eq!(session.transcript().len(), 4);

        session.clear();
        assert_eq!(session.questions(), 0);
    }
}
