//! Interview service: the effectful side of the state machine.
//!
//! Flow per action: check the state accepts the event → issue the model call(s)
//! → apply the pure transition. Any failure returns before `Session::apply`, so
//! the session is left exactly as it was.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::evaluation::evaluate_answer;
use crate::interview::prompts::{clarification_prompt, question_prompt};
use crate::interview::session::{Event, EventKind, InterviewState, Session, TransitionError};
use crate::llm_client::{CompletionClient, GEMINI_MODEL};

#[derive(Clone)]
pub struct InterviewService {
    llm: Arc<dyn CompletionClient>,
}

impl InterviewService {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_enabled()
    }

    pub fn load_resume(&self, session: &mut Session, resume_text: String) -> Result<(), AppError> {
        let chars = resume_text.len();
        let state = session.apply(Event::ResumeLoaded(resume_text))?;
        info!(session_id = %session.id, "Resume loaded ({chars} chars), state={state:?}");
        Ok(())
    }

    /// Generates the current question if the session needs one.
    /// An already generated question is kept; no model call is made for it.
    pub async fn ensure_question(&self, session: &mut Session) -> Result<(), AppError> {
        if session.state().current_question().is_some() {
            return Ok(());
        }
        session.state().accepts(EventKind::QuestionGenerated)?;
        let prompt = match session.state() {
            InterviewState::NeedQuestion(transcript) => {
                question_prompt(&transcript.resume_text, &transcript.history)
            }
            other => {
                return Err(TransitionError::InvalidTransition {
                    state: other.kind(),
                    event: EventKind::QuestionGenerated,
                }
                .into())
            }
        };

        info!(
            session_id = %session.id,
            "Generating question for round {}",
            session.state().round() + 1
        );
        let question = self.llm.complete(GEMINI_MODEL, &prompt).await.inspect_err(|e| {
            warn!(session_id = %session.id, "Question generation failed: {e}");
        })?;

        session.apply(Event::QuestionGenerated(question))?;
        Ok(())
    }

    pub async fn submit_answer(&self, session: &mut Session, answer: &str) -> Result<(), AppError> {
        session.state().accepts(EventKind::AnswerEvaluated)?;
        if answer.trim().is_empty() {
            return Err(TransitionError::EmptyAnswer.into());
        }
        let question = session
            .state()
            .current_question()
            .unwrap_or_default()
            .to_string();

        info!(
            session_id = %session.id,
            "Evaluating answer with {:?}",
            session.selected_model
        );
        let evaluation =
            evaluate_answer(self.llm.as_ref(), session.selected_model, &question, answer).await?;

        session.apply(Event::AnswerEvaluated {
            answer: answer.to_string(),
            evaluation,
        })?;
        info!(session_id = %session.id, "Evaluation completed");
        Ok(())
    }

    /// Requests suggestions for the current answer. Repeat calls overwrite the
    /// previous clarification.
    pub async fn clarify(&self, session: &mut Session) -> Result<(), AppError> {
        session.state().accepts(EventKind::ClarificationGenerated)?;
        let prompt = match session.state() {
            InterviewState::AwaitingConfirmation { round, .. } => {
                clarification_prompt(&round.question, &round.answer)
            }
            other => {
                return Err(TransitionError::InvalidTransition {
                    state: other.kind(),
                    event: EventKind::ClarificationGenerated,
                }
                .into())
            }
        };

        info!(session_id = %session.id, "Generating clarification");
        let clarification = self.llm.complete(GEMINI_MODEL, &prompt).await.inspect_err(|e| {
            warn!(session_id = %session.id, "Clarification generation failed: {e}");
        })?;

        session.apply(Event::ClarificationGenerated(clarification))?;
        Ok(())
    }

    /// Closes the current round and moves to the next question or the report.
    pub fn advance(&self, session: &mut Session) -> Result<(), AppError> {
        let state = session.apply(Event::Advance { at: Utc::now() })?;
        info!(
            session_id = %session.id,
            "Round {} recorded, state={state:?}",
            session.state().round()
        );
        Ok(())
    }
}
