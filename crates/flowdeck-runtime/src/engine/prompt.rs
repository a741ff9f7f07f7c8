//! Prompt assembly for generation nodes.

/// System prompt framing every generation call.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful AI assistant that answers questions based on the provided context.

Rules:
1. Use the context provided to answer the question accurately
2. If the answer is not in the context, say \"I don't have enough information to answer that question based on the provided context\"
3. Be concise but comprehensive
4. Cite relevant parts of the context when possible
5. If the context is empty, politely explain that no relevant information was found";

/// Builds the full prompt for a generation call.
///
/// Context chunks are joined with blank lines. When no context is available
/// the prompt asks the model to say so instead of inventing an answer.
pub fn build_prompt(query: &str, context_chunks: &[String]) -> String {
    let user_prompt = if context_chunks.is_empty() {
        format!(
            "No relevant context was found for this question.\n\n\
             Question: {query}\n\n\
             Please provide a helpful response explaining that you don't have \
             specific information about this topic in the knowledge base."
        )
    } else {
        let context_text = context_chunks.join("\n\n");
        format!(
            "Context:\n{context_text}\n\n\
             Question: {query}\n\n\
             Please answer the question based on the context provided above."
        )
    };

    format!("{SYSTEM_PROMPT}\n\n{user_prompt}")
}
