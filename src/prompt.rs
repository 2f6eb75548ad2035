//! Prompt construction for the generation adapter.
//!
//! Pure functions of the extracted text, no side effects. Two policies exist;
//! one is selected per deployment via `PROMPT_POLICY` — they never run
//! against the same route simultaneously.

use regex::Regex;

/// Which prompt is sent to the generative API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPolicy {
    /// Truncate noisy OCR output to its first 3 tokens before prompting.
    /// Discards context but keeps garbage out of the prompt.
    RefinedKeyword,
    /// Pass the raw extracted text and let the model compensate for OCR
    /// noise, flagging any assumptions it makes.
    FullContext,
}

impl PromptPolicy {
    /// Parse the `PROMPT_POLICY` env value.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "refined" => Some(Self::RefinedKeyword),
            "full" => Some(Self::FullContext),
            _ => None,
        }
    }

    pub fn build(&self, extracted_text: &str) -> String {
        match self {
            Self::RefinedKeyword => {
                let refined = refine_text(extracted_text);
                format!(
                    "Please provide structured simple small points information on the \
                     following medicine: {}. Its name, Its use, its issues, its containt ?",
                    refined
                )
            }
            Self::FullContext => format!(
                "Given the following unstructured and incomplete text data, provide a \
                 well-formatted and structured response. Use contextual understanding to \
                 identify key information such as the product name, description, uses, \
                 issues, precautions, and any additional information. If parts of the text \
                 are unclear, make logical assumptions while clearly marking such \
                 assumptions. Structure the response with proper headings, subheadings, \
                 bullet points, and lists for clarity. Use bold text for headings and \
                 proper formatting to improve readability for medicine: {}.",
                extracted_text
            ),
        }
    }
}

/// Clean up noisy OCR output and keep only the first 3 tokens.
///
/// Strips the registered-trademark symbol, collapses whitespace runs to single
/// spaces, drops every character that is not a word character, space, or
/// period, then truncates.
pub fn refine_text(extracted_text: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    let disallowed = Regex::new(r"[^\w .]").unwrap();

    let cleaned = extracted_text.replace('®', "");
    let cleaned = whitespace.replace_all(&cleaned, " ");
    let cleaned = disallowed.replace_all(&cleaned, "");

    cleaned
        .trim()
        .split_whitespace()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_strips_symbols_and_truncates() {
        assert_eq!(
            refine_text("Para®cetamol   500mg tablet!!"),
            "Paracetamol 500mg tablet"
        );
    }

    #[test]
    fn test_refine_keeps_at_most_three_tokens() {
        assert_eq!(
            refine_text("Orlistat Capsules USP 120mg pack of 30"),
            "Orlistat Capsules USP"
        );
    }

    #[test]
    fn test_refine_collapses_whitespace_runs() {
        assert_eq!(refine_text("ASPIRIN\n\t 300MG"), "ASPIRIN 300MG");
    }

    #[test]
    fn test_refine_is_deterministic() {
        let input = "Ibu®profen  200mg (coated)";
        assert_eq!(refine_text(input), refine_text(input));
        assert_eq!(refine_text(input), "Ibuprofen 200mg coated");
    }

    #[test]
    fn test_refined_prompt_embeds_refined_text() {
        let prompt = PromptPolicy::RefinedKeyword.build("Para®cetamol   500mg tablet!!");
        assert!(prompt.contains("medicine: Paracetamol 500mg tablet."));
        assert!(prompt.starts_with("Please provide structured"));
    }

    #[test]
    fn test_full_context_prompt_passes_raw_text() {
        let raw = "ASPIRIN 300MG (blister) ©";
        let prompt = PromptPolicy::FullContext.build(raw);
        assert!(prompt.contains(raw));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            PromptPolicy::from_str("refined"),
            Some(PromptPolicy::RefinedKeyword)
        );
        assert_eq!(
            PromptPolicy::from_str("full"),
            Some(PromptPolicy::FullContext)
        );
        assert_eq!(PromptPolicy::from_str("both"), None);
    }
}
