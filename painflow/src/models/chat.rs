//! Chat request types for the live streaming surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which assistant persona answers a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatMode {
    /// Open conversation.
    #[default]
    General,
    /// Helps identify pains.
    PainAnalysis,
    /// Helps design solutions.
    SolutionDesign,
    /// Helps specify agents.
    AgentGeneration,
}

impl ChatMode {
    /// The mode a user moves to after running the current one.
    ///
    /// `AgentGeneration` is the last mode and stays put.
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            Self::General => Self::PainAnalysis,
            Self::PainAnalysis => Self::SolutionDesign,
            Self::SolutionDesign | Self::AgentGeneration => Self::AgentGeneration,
        }
    }

    /// The wire identifier, e.g. `pain-analysis`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::PainAnalysis => "pain-analysis",
            Self::SolutionDesign => "solution-design",
            Self::AgentGeneration => "agent-generation",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::General,
            Self::PainAnalysis,
            Self::SolutionDesign,
            Self::AgentGeneration,
        ]
        .into_iter()
        .find(|mode| mode.as_str() == s)
        .ok_or_else(|| format!("unknown chat mode: {s}"))
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the assistant.
    System,
    /// The person chatting.
    User,
    /// The model.
    Assistant,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote it.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body posted to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Persona answering the turn.
    #[serde(default)]
    pub mode: ChatMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_progression() {
        let mut mode = ChatMode::General;
        let mut seen = vec![mode];
        for _ in 0..4 {
            mode = mode.advance();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                ChatMode::General,
                ChatMode::PainAnalysis,
                ChatMode::SolutionDesign,
                ChatMode::AgentGeneration,
                ChatMode::AgentGeneration,
            ]
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("pain-analysis".parse::<ChatMode>(), Ok(ChatMode::PainAnalysis));
        assert!("chat".parse::<ChatMode>().is_err());
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("hello")],
            mode: ChatMode::SolutionDesign,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [{"role": "user", "content": "hello"}],
                "mode": "solution-design"
            })
        );
    }
}
