use studentia_core::types::PackedContext;

/// Instruction header. The fallback sentence is what the model must answer
/// when the context does not contain the answer.
pub const DEFAULT_HEADER: &str = "Answer the question as truthfully as possible using the provided context, and if the answer is not undoubtedly contained within the text below, absolutely don't answer anything except for saying \"Sorry, I don't have that information. Please visit Ewha Womans University official website at https://www.ewha.ac.kr/ewhaen/index.do for more information.\"\n\nContext:\n";

/// Renders `header + context + "\n\n Q: " + question + "\n A:"`.
///
/// The question is inserted verbatim; nothing is escaped.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    header: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self { header: DEFAULT_HEADER.to_string() }
    }

    pub fn with_header(header: impl Into<String>) -> Self {
        Self { header: header.into() }
    }

    pub fn build(&self, question: &str, packed: &PackedContext) -> String {
        let mut prompt = String::with_capacity(self.header.len() + question.len() + 16);
        prompt.push_str(&self.header);
        for snippet in &packed.snippets {
            prompt.push_str(snippet);
        }
        prompt.push_str("\n\n Q: ");
        prompt.push_str(question);
        prompt.push_str("\n A:");
        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
