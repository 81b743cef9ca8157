//! Prompt templates for the plain and healing attempts.

/// Prompt for the first, plain attempt.
pub fn base_prompt(query: &str) -> String {
    format!(
        "You are a helpful AI assistant. Answer the user's question clearly and concisely.\n\
         Question: {query}\n\
         Answer:"
    )
}

/// Prompt for a healing attempt, carrying retrieved memories as context.
///
/// Memories are joined one per line. An empty slice leaves the context
/// block empty rather than dropping it.
pub fn healing_prompt(query: &str, memories: &[String]) -> String {
    let context = memories.join("\n");
    format!(
        "You are a helpful AI assistant. Your first attempt to answer was not good enough.\n\
         Try again, but this time use the following context from your memory \
         to provide a better, more detailed answer.\n\
         \n\
         Relevant Context from Memory:\n\
         {context}\n\
         \n\
         Original Question: {query}\n\
         Answer:"
    )
}
