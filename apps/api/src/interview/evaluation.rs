//! Answer evaluation across one or two backends.
//!
//! Each backend gets the same prompt. Results are labelled per backend and
//! stored verbatim; the sub-scores the prompt asks for are never parsed.

use tracing::{info, warn};

use crate::interview::model::{Backend, EvaluationModel};
use crate::interview::prompts::evaluation_prompt;
use crate::llm_client::{CompletionClient, LlmError};

/// Formats one backend's evaluation as a labelled markdown section.
pub fn label_evaluation(backend: Backend, text: &str) -> String {
    format!("**Evaluation from {}:**\n{}", backend.label(), text)
}

/// Calls each selected backend strictly in order. The first failure aborts the
/// whole evaluation so no partial result is stored.
pub async fn evaluate_answer(
    llm: &dyn CompletionClient,
    model: EvaluationModel,
    question: &str,
    answer: &str,
) -> Result<String, LlmError> {
    let prompt = evaluation_prompt(question, answer);
    let mut sections = Vec::with_capacity(model.backends().len());

    for &backend in model.backends() {
        info!("Calling {} model for evaluation...", backend.label());
        let text = llm
            .complete(backend.model_id(), &prompt)
            .await
            .inspect_err(|e| warn!("Evaluation with {} failed: {e}", backend.label()))?;
        sections.push(label_evaluation(backend, &text));
    }

    Ok(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::ScriptedClient;
    use crate::llm_client::{GEMINI_MODEL, QWEN_MODEL};

    #[tokio::test]
    async fn test_single_backend_is_labelled() {
        let llm = ScriptedClient::new();
        let evaluation = evaluate_answer(&llm, EvaluationModel::Gemini, "Q", "A")
            .await
            .unwrap();
        assert_eq!(
            evaluation,
            format!("**Evaluation from Gemini:**\nreply 1 from {GEMINI_MODEL}")
        );
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_qwen_only_calls_qwen() {
        let llm = ScriptedClient::new();
        let evaluation = evaluate_answer(&llm, EvaluationModel::Qwen, "Q", "A")
            .await
            .unwrap();
        assert!(evaluation.starts_with("**Evaluation from Qwen:**\n"));
        assert_eq!(llm.calls_to(QWEN_MODEL), 1);
        assert_eq!(llm.calls_to(GEMINI_MODEL), 0);
    }

    #[tokio::test]
    async fn test_both_calls_each_backend_once_in_order() {
        let llm = ScriptedClient::new();
        let evaluation = evaluate_answer(&llm, EvaluationModel::Both, "Q", "A")
            .await
            .unwrap();

        let calls = llm.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].model, GEMINI_MODEL);
        assert_eq!(calls[1].model, QWEN_MODEL);
        assert_eq!(calls[0].prompt, calls[1].prompt);

        assert_eq!(
            evaluation,
            format!(
                "**Evaluation from Gemini:**\nreply 1 from {GEMINI_MODEL}\n\n\
                 **Evaluation from Qwen:**\nreply 2 from {QWEN_MODEL}"
            )
        );
    }

    #[tokio::test]
    async fn test_both_fails_if_second_backend_fails() {
        let llm = ScriptedClient::new();
        llm.fail_model(QWEN_MODEL);
        let result = evaluate_answer(&llm, EvaluationModel::Both, "Q", "A").await;
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_first_failure_skips_second_backend() {
        let llm = ScriptedClient::new();
        llm.fail_model(GEMINI_MODEL);
        let result = evaluate_answer(&llm, EvaluationModel::Both, "Q", "A").await;
        assert!(result.is_err());
        assert_eq!(llm.calls_to(QWEN_MODEL), 0);
    }
}
