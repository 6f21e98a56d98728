//! Interview session state machine.
//!
//! The state is a tagged enum where each variant carries only the fields that
//! are meaningful in it. `transition` is pure: it never mutates its input and
//! never performs I/O. Completion results arrive as events produced by
//! `InterviewService`, so a failed model call simply means no event is applied.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::interview::model::{EvaluationModel, RoundRecord, MAX_ROUNDS};

/// Resume text plus every completed round. Round number is `history.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub resume_text: String,
    pub history: Vec<RoundRecord>,
}

/// The in-progress round once an answer has been evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRound {
    pub question: String,
    pub answer: String,
    pub evaluation: String,
    pub clarification: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterviewState {
    NoResume,
    NeedQuestion(Transcript),
    AwaitingAnswer {
        transcript: Transcript,
        question: String,
    },
    AwaitingConfirmation {
        transcript: Transcript,
        round: OpenRound,
    },
    Completed(Transcript),
}

/// Field-less mirror of `InterviewState`, used in errors and API views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    NoResume,
    NeedQuestion,
    AwaitingAnswer,
    AwaitingConfirmation,
    Completed,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StateKind::NoResume => "no resume has been uploaded",
            StateKind::NeedQuestion => "a question still needs to be generated",
            StateKind::AwaitingAnswer => "waiting for an answer",
            StateKind::AwaitingConfirmation => "waiting to move to the next question",
            StateKind::Completed => "the interview is completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ResumeLoaded(String),
    QuestionGenerated(String),
    AnswerEvaluated { answer: String, evaluation: String },
    ClarificationGenerated(String),
    Advance { at: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ResumeLoaded,
    QuestionGenerated,
    AnswerEvaluated,
    ClarificationGenerated,
    Advance,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::ResumeLoaded => "load a resume",
            EventKind::QuestionGenerated => "generate a question",
            EventKind::AnswerEvaluated => "submit an answer",
            EventKind::ClarificationGenerated => "request a clarification",
            EventKind::Advance => "proceed to the next question",
        };
        f.write_str(s)
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ResumeLoaded(_) => EventKind::ResumeLoaded,
            Event::QuestionGenerated(_) => EventKind::QuestionGenerated,
            Event::AnswerEvaluated { .. } => EventKind::AnswerEvaluated,
            Event::ClarificationGenerated(_) => EventKind::ClarificationGenerated,
            Event::Advance { .. } => EventKind::Advance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Resume contains no extractable text")]
    EmptyResume,

    #[error("Please enter your answer before submitting")]
    EmptyAnswer,

    #[error("Generated {0} is empty")]
    EmptyContent(&'static str),

    #[error("Interview is completed; only the report is available")]
    Completed,

    #[error("Cannot {event} while {state}")]
    InvalidTransition { state: StateKind, event: EventKind },
}

impl InterviewState {
    pub fn kind(&self) -> StateKind {
        match self {
            InterviewState::NoResume => StateKind::NoResume,
            InterviewState::NeedQuestion(_) => StateKind::NeedQuestion,
            InterviewState::AwaitingAnswer { .. } => StateKind::AwaitingAnswer,
            InterviewState::AwaitingConfirmation { .. } => StateKind::AwaitingConfirmation,
            InterviewState::Completed(_) => StateKind::Completed,
        }
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        match self {
            InterviewState::NoResume => None,
            InterviewState::NeedQuestion(t) | InterviewState::Completed(t) => Some(t),
            InterviewState::AwaitingAnswer { transcript, .. }
            | InterviewState::AwaitingConfirmation { transcript, .. } => Some(transcript),
        }
    }

    pub fn history(&self) -> &[RoundRecord] {
        self.transcript().map(|t| t.history.as_slice()).unwrap_or(&[])
    }

    /// Number of completed rounds.
    pub fn round(&self) -> usize {
        self.history().len()
    }

    pub fn current_question(&self) -> Option<&str> {
        match self {
            InterviewState::AwaitingAnswer { question, .. } => Some(question),
            InterviewState::AwaitingConfirmation { round, .. } => Some(&round.question),
            _ => None,
        }
    }

    /// Checks whether an event of this kind may be applied, without applying it.
    /// The service calls this before issuing any model call.
    pub fn accepts(&self, event: EventKind) -> Result<(), TransitionError> {
        let ok = matches!(
            (self, event),
            (_, EventKind::ResumeLoaded)
                | (InterviewState::NeedQuestion(_), EventKind::QuestionGenerated)
                | (InterviewState::AwaitingAnswer { .. }, EventKind::AnswerEvaluated)
                | (
                    InterviewState::AwaitingConfirmation { .. },
                    EventKind::ClarificationGenerated | EventKind::Advance
                )
        );
        if ok {
            Ok(())
        } else if let InterviewState::Completed(_) = self {
            Err(TransitionError::Completed)
        } else {
            Err(TransitionError::InvalidTransition {
                state: self.kind(),
                event,
            })
        }
    }
}

/// Opens the next round, or completes the interview once the cap is reached.
fn next_round(transcript: Transcript) -> InterviewState {
    if transcript.history.len() >= MAX_ROUNDS {
        InterviewState::Completed(transcript)
    } else {
        InterviewState::NeedQuestion(transcript)
    }
}

fn non_blank(text: &str, what: &'static str) -> Result<(), TransitionError> {
    if text.trim().is_empty() {
        Err(TransitionError::EmptyContent(what))
    } else {
        Ok(())
    }
}

/// Pure transition function. On error the caller keeps its current state.
pub fn transition(state: &InterviewState, event: Event) -> Result<InterviewState, TransitionError> {
    state.accepts(event.kind())?;

    match (state.clone(), event) {
        (state, Event::ResumeLoaded(text)) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyResume);
            }
            Ok(replace_resume(state, text))
        }

        (InterviewState::NeedQuestion(transcript), Event::QuestionGenerated(question)) => {
            non_blank(&question, "question")?;
            Ok(InterviewState::AwaitingAnswer {
                transcript,
                question,
            })
        }

        (
            InterviewState::AwaitingAnswer {
                transcript,
                question,
            },
            Event::AnswerEvaluated { answer, evaluation },
        ) => {
            if answer.trim().is_empty() {
                return Err(TransitionError::EmptyAnswer);
            }
            non_blank(&evaluation, "evaluation")?;
            Ok(InterviewState::AwaitingConfirmation {
                transcript,
                round: OpenRound {
                    question,
                    answer,
                    evaluation,
                    clarification: None,
                },
            })
        }

        (
            InterviewState::AwaitingConfirmation {
                transcript,
                mut round,
            },
            Event::ClarificationGenerated(clarification),
        ) => {
            non_blank(&clarification, "clarification")?;
            round.clarification = Some(clarification);
            Ok(InterviewState::AwaitingConfirmation { transcript, round })
        }

        (
            InterviewState::AwaitingConfirmation {
                mut transcript,
                round,
            },
            Event::Advance { at },
        ) => {
            transcript.history.push(RoundRecord {
                question: round.question,
                answer: round.answer,
                evaluation: round.evaluation,
                clarification: round.clarification.unwrap_or_default(),
                completed_at: at,
            });
            Ok(next_round(transcript))
        }

        (state, event) => Err(TransitionError::InvalidTransition {
            state: state.kind(),
            event: event.kind(),
        }),
    }
}

/// A new resume replaces the old text; everything else about the session stays.
fn replace_resume(state: InterviewState, resume_text: String) -> InterviewState {
    match state {
        InterviewState::NoResume => next_round(Transcript {
            resume_text,
            history: Vec::new(),
        }),
        InterviewState::NeedQuestion(mut t) => {
            t.resume_text = resume_text;
            InterviewState::NeedQuestion(t)
        }
        InterviewState::AwaitingAnswer {
            mut transcript,
            question,
        } => {
            transcript.resume_text = resume_text;
            InterviewState::AwaitingAnswer {
                transcript,
                question,
            }
        }
        InterviewState::AwaitingConfirmation {
            mut transcript,
            round,
        } => {
            transcript.resume_text = resume_text;
            InterviewState::AwaitingConfirmation { transcript, round }
        }
        InterviewState::Completed(mut t) => {
            t.resume_text = resume_text;
            InterviewState::Completed(t)
        }
    }
}

/// One browser session's interview.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub selected_model: EvaluationModel,
    state: InterviewState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            selected_model: EvaluationModel::default(),
            state: InterviewState::NoResume,
        }
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    /// Applies an event; the state is untouched if the transition is rejected.
    pub fn apply(&mut self, event: Event) -> Result<StateKind, TransitionError> {
        self.state = transition(&self.state, event)?;
        Ok(self.state.kind())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
