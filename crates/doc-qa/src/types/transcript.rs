//! Chat transcript: ordered question/answer pairs

use serde::{Deserialize, Serialize};

/// Question shown for the summary pseudo pair that seeds every transcript
pub const SUMMARY_QUESTION: &str = "📄 Summary";

/// One question and its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// The pseudo pair holding a document summary
    pub fn summary(summary: impl Into<String>) -> Self {
        Self::new(SUMMARY_QUESTION, summary)
    }
}

/// Insertion-ordered chat history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatTranscript {
    turns: Vec<ChatTurn>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.turns.iter()
    }

    /// Copy of the transcript with an extra trailing turn, leaving `self` untouched
    pub fn with_turn(&self, turn: ChatTurn) -> Vec<ChatTurn> {
        let mut turns = self.turns.clone();
        turns.push(turn);
        turns
    }
}

impl From<Vec<ChatTurn>> for ChatTranscript {
    fn from(turns: Vec<ChatTurn>) -> Self {
        Self { turns }
    }
}

impl<'a> IntoIterator for &'a ChatTranscript {
    type Item = &'a ChatTurn;
    type IntoIter = std::slice::Iter<'a, ChatTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_kept() {
        let mut transcript = ChatTranscript::new();
        transcript.push(ChatTurn::summary("A short report."));
        transcript.push(ChatTurn::new("Who wrote it?", "Ada."));

        let questions: Vec<&str> = transcript.iter().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec![SUMMARY_QUESTION, "Who wrote it?"]);
    }

    #[test]
    fn test_with_turn_does_not_mutate() {
        let transcript = ChatTranscript::from(vec![ChatTurn::summary("s")]);
        let shown = transcript.with_turn(ChatTurn::new("q", "a"));
        assert_eq!(shown.len(), 2);
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_serializes_as_list() {
        let transcript = ChatTranscript::from(vec![ChatTurn::new("q", "a")]);
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(json, serde_json::json!([{ "question": "q", "answer": "a" }]));
    }
}
