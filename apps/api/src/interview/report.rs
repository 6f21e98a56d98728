//! Final performance report. Lists every round in order; nothing is aggregated.

use serde::Serialize;

use crate::interview::model::RoundRecord;

pub const REPORT_INTRO: &str =
    "Thank you for participating in the interview. Below is your performance report:";

#[derive(Debug, Clone, Serialize)]
pub struct InterviewReport {
    pub completed_rounds: usize,
    pub rounds: Vec<RoundRecord>,
    pub markdown: String,
}

impl InterviewReport {
    pub fn from_history(history: &[RoundRecord]) -> Self {
        Self {
            completed_rounds: history.len(),
            rounds: history.to_vec(),
            markdown: render_report(history),
        }
    }
}

/// Renders the history as markdown. Clarification is shown only when present.
pub fn render_report(history: &[RoundRecord]) -> String {
    let mut report = String::new();
    for (i, entry) in history.iter().enumerate() {
        report.push_str(&format!("### Round {}\n", i + 1));
        report.push_str(&format!("**Question:** {}\n\n", entry.question));
        report.push_str(&format!("**Your Answer:** {}\n\n", entry.answer));
        report.push_str(&format!("**Evaluation:** {}\n\n", entry.evaluation));
        if !entry.clarification.is_empty() {
            report.push_str(&format!("**Clarification:** {}\n\n", entry.clarification));
        }
        report.push_str("---\n\n");
    }
    report
}
