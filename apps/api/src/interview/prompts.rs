// All LLM prompt templates for the interview flow.
// Placeholders are substituted with `str::replace` before sending.

use crate::interview::model::RoundRecord;

/// Shown in place of the history on the first round.
pub const EMPTY_HISTORY: &str = "No previous conversation.";

/// Question generation template.
/// Replace: {resume_text}, {history_text}
pub const QUESTION_PROMPT_TEMPLATE: &str = "You are an interviewer. Given the candidate's resume and the conversation so far, \
please generate a dynamic, context-specific interview question that probes the candidate's hands-on skills \
and understanding of key concepts mentioned in the resume. Avoid generic questions and ensure the question \
is relevant to the candidate's background.

Candidate's Resume:
{resume_text}

Conversation History:
{history_text}

Interview Question:";

/// Answer evaluation template. Scores are requested for display only.
/// Replace: {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = "Evaluate the candidate's answer to the interview question with a focus on practical skills, project experience, \
and clarity of the core concepts. Consider that the candidate may describe hands-on experiences differently.

Question: {question}

Answer: {answer}

Please provide two scores out of 100:
1. Practical Skills and Project Experience: How well does the candidate demonstrate hands-on abilities?
2. Clarity and Depth of Concept Explanation: How clearly and thoroughly does the candidate explain the concepts?

Briefly mention any areas for improvement.";

/// Clarification template.
/// Replace: {question}, {answer}
pub const CLARIFICATION_PROMPT_TEMPLATE: &str = "You are an interviewer assisting a candidate in refining their answer. \
The candidate has just provided an answer to the following question. \
Please provide suggestions on how they can clarify, rephrase, or further elaborate their answer, \
highlighting areas that might need more detail.

Question: {question}

Candidate's Answer: {answer}

Clarification and Suggestions:";

/// Renders completed rounds as `Qn: …` / `An: …` lines.
pub fn render_history(history: &[RoundRecord]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Q{n}: {}\nA{n}: {}\n", r.question, r.answer, n = i + 1))
        .collect()
}

pub fn question_prompt(resume_text: &str, history: &[RoundRecord]) -> String {
    // History goes in first so resume text containing "{history_text}" is left alone.
    QUESTION_PROMPT_TEMPLATE
        .replace("{history_text}", &render_history(history))
        .replace("{resume_text}", resume_text)
}

pub fn evaluation_prompt(question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

pub fn clarification_prompt(question: &str, answer: &str) -> String {
    CLARIFICATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(question: &str, answer: &str) -> RoundRecord {
        RoundRecord {
            question: question.to_string(),
            answer: answer.to_string(),
            evaluation: "eval".to_string(),
            clarification: String::new(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history_uses_placeholder() {
        assert_eq!(render_history(&[]), "No previous conversation.");
    }

    #[test]
    fn test_history_renders_numbered_pairs_in_order() {
        let history = vec![
            record("What is Flask?", "A micro framework"),
            record("Why Django?", "Batteries included"),
        ];
        assert_eq!(
            render_history(&history),
            "Q1: What is Flask?\nA1: A micro framework\nQ2: Why Django?\nA2: Batteries included\n"
        );
    }

    #[test]
    fn test_question_prompt_contains_resume_and_history() {
        let prompt = question_prompt("5 years Python, built REST APIs", &[]);
        assert!(prompt.contains("Candidate's Resume:\n5 years Python, built REST APIs"));
        assert!(prompt.contains("Conversation History:\nNo previous conversation."));
        assert!(prompt.ends_with("Interview Question:"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{history_text}"));
    }

    #[test]
    fn test_resume_text_with_braces_is_not_reinterpreted() {
        let prompt = question_prompt("templating: {history_text}", &[record("Q", "A")]);
        assert!(prompt.contains("templating: {history_text}"));
        assert!(prompt.contains("Q1: Q\nA1: A\n"));
    }

    #[test]
    fn test_evaluation_prompt_asks_for_two_scores() {
        let prompt = evaluation_prompt("Explain REST", "I used Flask and Django");
        assert!(prompt.contains("Question: Explain REST"));
        assert!(prompt.contains("Answer: I used Flask and Django"));
        assert!(prompt.contains("two scores out of 100"));
        assert!(prompt.contains("1. Practical Skills and Project Experience"));
        assert!(prompt.contains("2. Clarity and Depth of Concept Explanation"));
    }

    #[test]
    fn test_clarification_prompt_layout() {
        let prompt = clarification_prompt("Explain REST", "It is stateless");
        assert!(prompt.contains("Question: Explain REST"));
        assert!(prompt.contains("Candidate's Answer: It is stateless"));
        assert!(prompt.ends_with("Clarification and Suggestions:"));
    }
}
