//! Prompt/completion enrichment for chat-model observations.
//!
//! [`ChatModelObservationFilter`] pulls the prompt texts out of the request
//! and the completion texts out of the response, joins each group into a
//! single string, and appends them as the `gen_ai.prompt` and
//! `gen_ai.completion` high-cardinality key values. Both keys are always
//! written, even when empty.
//!
//! Completion texts follow a first-match policy:
//! 1. no response, or a response with no results: nothing;
//! 2. the first result has non-blank text: only that text, later results
//!    are ignored;
//! 3. otherwise: every result with non-blank text, in order.

use super::chat::{ChatModelObservationContext, ChatResponse, Generation};
use super::{ObservationContext, ObservationFilter};
use crate::telemetry::genai::{GEN_AI_COMPLETION, GEN_AI_PROMPT};

/// How a list of texts is rendered into one attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Concatenation {
    /// Entries joined with the separator. An empty list renders as `""`.
    Delimited(String),
    /// `["a", "b"]`: each entry quoted, comma separated, bracketed.
    /// An empty list renders as `[]`.
    QuotedList,
}

impl Default for Concatenation {
    fn default() -> Self {
        Self::Delimited("\n".to_string())
    }
}

impl Concatenation {
    /// Render `texts` in order. Empty entries are kept.
    pub fn concatenate<S: AsRef<str>>(&self, texts: &[S]) -> String {
        match self {
            Self::Delimited(sep) => texts
                .iter()
                .map(|t| -> &str { t.as_ref() })
                .collect::<Vec<_>>()
                .join(sep),
            Self::QuotedList => {
                let quoted: Vec<String> = texts
                    .iter()
                    .map(|t| {
                        let t: &str = t.as_ref();
                        format!("\"{t}\"")
                    })
                    .collect();
                format!("[{}]", quoted.join(", "))
            }
        }
    }
}

/// Observation filter that records prompt and completion text on chat-model
/// observations. Other observations pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct ChatModelObservationFilter {
    concatenation: Concatenation,
}

impl ChatModelObservationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concatenation(concatenation: Concatenation) -> Self {
        Self { concatenation }
    }

    /// Append `gen_ai.prompt` and `gen_ai.completion` to the context.
    ///
    /// Calling this twice on the same context appends both keys twice.
    pub fn enrich(&self, context: &mut ChatModelObservationContext) {
        let prompts = prompt_texts(context);
        let completions = completion_texts(context.response.as_ref());

        let prompt = self.concatenation.concatenate(&prompts);
        let completion = self.concatenation.concatenate(&completions);

        tracing::trace!(
            prompts = prompts.len(),
            completions = completions.len(),
            "enriching chat model observation"
        );

        context.add_high_cardinality_key_value(GEN_AI_PROMPT, prompt);
        context.add_high_cardinality_key_value(GEN_AI_COMPLETION, completion);
    }
}

impl ObservationFilter for ChatModelObservationFilter {
    fn map(&self, mut context: ObservationContext) -> ObservationContext {
        if let Some(chat) = context.as_chat_model_mut() {
            self.enrich(chat);
        }
        context
    }
}

/// Texts of every request instruction, in order, blanks included.
fn prompt_texts(context: &ChatModelObservationContext) -> Vec<&str> {
    context
        .request
        .instructions
        .iter()
        .map(|m| m.text.as_str())
        .collect()
}

fn completion_texts(response: Option<&ChatResponse>) -> Vec<&str> {
    let Some(response) = response else {
        return Vec::new();
    };
    let Some(first) = response.result() else {
        return Vec::new();
    };

    if let Some(text) = first.text().filter(|t| has_text(t)) {
        return vec![text];
    }

    response
        .results
        .iter()
        .filter_map(Generation::text)
        .filter(|t| has_text(t))
        .collect()
}

/// True when `s` contains at least one non-whitespace character.
fn has_text(s: &str) -> bool {
    s.chars().any(|c| !is_blank_char(c))
}

/// Blank characters: Unicode space, line and paragraph separators except the
/// non-breaking ones (U+00A0, U+2007, U+202F), plus the ASCII controls
/// `\t`..`\r` and U+001C..U+001F. U+0085 counts as text.
fn is_blank_char(c: char) -> bool {
    match c {
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{0085}' => false,
        '\u{001C}'..='\u{001F}' => true,
        _ => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::chat::{Message, Prompt};

    fn response(texts: &[Option<&str>]) -> ChatResponse {
        ChatResponse::new(
            texts
                .iter()
                .map(|t| match t {
                    Some(t) => Generation::new(*t),
                    None => Generation::empty(),
                })
                .collect(),
        )
    }

    #[test]
    fn has_text_rejects_whitespace_only() {
        assert!(!has_text(""));
        assert!(!has_text(" \t\n"));
        assert!(has_text(" x "));
        assert!(!has_text("\u{2003}\u{3000}\u{2028}\u{001F}"));
    }

    #[test]
    fn non_breaking_spaces_count_as_text() {
        assert!(has_text("\u{00A0}"));
        assert!(has_text("\u{2007}"));
        assert!(has_text("\u{202F}"));
        assert!(has_text("\u{0085}"));
    }

    #[test]
    fn non_breaking_space_first_result_wins() {
        let r = response(&[Some("\u{00A0}"), Some("b")]);
        assert_eq!(completion_texts(Some(&r)), vec!["\u{00A0}"]);
    }

    #[test]
    fn no_response_means_no_completions() {
        assert!(completion_texts(None).is_empty());
        assert!(completion_texts(Some(&ChatResponse::default())).is_empty());
    }

    #[test]
    fn non_blank_first_result_wins() {
        let r = response(&[Some("first"), Some("second")]);
        assert_eq!(completion_texts(Some(&r)), vec!["first"]);
    }

    #[test]
    fn blank_first_result_falls_back_to_all_non_blank() {
        let r = response(&[Some("  "), None, Some("a"), Some(""), Some("b")]);
        assert_eq!(completion_texts(Some(&r)), vec!["a", "b"]);
    }

    #[test]
    fn first_result_without_text_falls_back() {
        let r = ChatResponse::new(vec![
            Generation {
                output: Some(Default::default()),
            },
            Generation::new("4"),
        ]);
        assert_eq!(completion_texts(Some(&r)), vec!["4"]);
    }

    #[test]
    fn prompt_texts_keep_empty_entries() {
        let ctx = ChatModelObservationContext::new(
            Prompt {
                instructions: vec![Message::system(""), Message::user("q")],
                model: None,
            },
            "test",
        );
        assert_eq!(prompt_texts(&ctx), vec!["", "q"]);
    }

    #[test]
    fn delimited_concatenation() {
        let c = Concatenation::Delimited(", ".to_string());
        assert_eq!(c.concatenate::<&str>(&[]), "");
        assert_eq!(c.concatenate(&["a", "", "b"]), "a, , b");
        assert_eq!(Concatenation::default().concatenate(&["a", "b"]), "a\nb");
    }

    #[test]
    fn quoted_list_concatenation() {
        let c = Concatenation::QuotedList;
        assert_eq!(c.concatenate::<&str>(&[]), "[]");
        assert_eq!(c.concatenate(&["a", "b"]), "[\"a\", \"b\"]");
    }
}
