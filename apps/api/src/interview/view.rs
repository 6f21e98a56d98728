use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::interview::model::{EvaluationModel, RoundRecord, MAX_ROUNDS};
use crate::interview::report::{render_report, REPORT_INTRO};
use crate::interview::session::{InterviewState, Session, StateKind};

pub const MISSING_API_KEY_WARNING: &str = "API key not found. Set OPENROUTER_API_KEY in the \
    environment (or .env) to enable question generation and evaluation.";

/// Everything the page needs to render one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub state: StateKind,
    /// 1-based number of the round being played; equals `max_rounds` when completed.
    pub round: usize,
    pub completed_rounds: usize,
    pub max_rounds: usize,
    pub selected_model: EvaluationModel,
    pub has_resume: bool,
    pub llm_enabled: bool,
    pub warning: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub evaluation: Option<String>,
    pub clarification: Option<String>,
    pub history: Vec<RoundRecord>,
    pub report_intro: Option<&'static str>,
    pub report: Option<String>,
}

impl SessionView {
    pub fn new(session: &Session, llm_enabled: bool) -> Self {
        let state = session.state();
        let completed_rounds = state.round();

        let (answer, evaluation, clarification) = match state {
            InterviewState::AwaitingConfirmation { round, .. } => (
                Some(round.answer.clone()),
                Some(round.evaluation.clone()),
                round.clarification.clone(),
            ),
            _ => (None, None, None),
        };

        let completed = state.kind() == StateKind::Completed;

        Self {
            id: session.id,
            created_at: session.created_at,
            state: state.kind(),
            round: (completed_rounds + 1).min(MAX_ROUNDS),
            completed_rounds,
            max_rounds: MAX_ROUNDS,
            selected_model: session.selected_model,
            has_resume: state.transcript().is_some(),
            llm_enabled,
            warning: (!llm_enabled).then(|| MISSING_API_KEY_WARNING.to_string()),
            question: state.current_question().map(str::to_string),
            answer,
            evaluation,
            clarification,
            history: state.history().to_vec(),
            report_intro: completed.then_some(REPORT_INTRO),
            report: completed.then(|| render_report(state.history())),
        }
    }
}
