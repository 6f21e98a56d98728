use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_client::{GEMINI_MODEL, QWEN_MODEL};

/// Number of rounds after which the interview ends and the report is shown.
pub const MAX_ROUNDS: usize = 5;

/// One remote model that can evaluate answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Gemini,
    Qwen,
}

impl Backend {
    pub fn model_id(self) -> &'static str {
        match self {
            Backend::Gemini => GEMINI_MODEL,
            Backend::Qwen => QWEN_MODEL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Backend::Gemini => "Gemini",
            Backend::Qwen => "Qwen",
        }
    }
}

/// The user's choice of evaluation backend(s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationModel {
    #[default]
    Gemini,
    Qwen,
    Both,
}

impl EvaluationModel {
    /// Backends to call, in call order.
    pub fn backends(self) -> &'static [Backend] {
        match self {
            EvaluationModel::Gemini => &[Backend::Gemini],
            EvaluationModel::Qwen => &[Backend::Qwen],
            EvaluationModel::Both => &[Backend::Gemini, Backend::Qwen],
        }
    }
}

/// A completed round, appended to the history when the user moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub question: String,
    pub answer: String,
    pub evaluation: String,
    /// Last clarification requested in the round, empty if none.
    pub clarification: String,
    pub completed_at: DateTime<Utc>,
}
