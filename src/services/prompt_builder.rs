// src/services/prompt_builder.rs
use crate::message::Exchange;

/// How many trailing exchanges are replayed into the prompt.
pub const HISTORY_WINDOW: usize = 5;

pub const NO_PREVIOUS_CONVERSATION: &str = "No previous conversation.";

/// Render the healthcare-assistant prompt for `message`, replaying the last
/// [`HISTORY_WINDOW`] exchanges of `history` oldest first.
pub fn build_prompt(history: &[Exchange], message: &str) -> String {
    let context = render_context(history);

    format!(
        "You are HealthAssist, a helpful and empathetic AI healthcare assistant.

IMPORTANT GUIDELINES:
1. Provide accurate, helpful health information while always reminding users to consult with healthcare professionals for medical advice
2. Be concise but thorough in your responses
3. Use simple language and avoid medical jargon when possible
4. If discussing symptoms, always recommend consulting a doctor
5. For emergencies, immediately advise seeking urgent medical care
6. Focus on general wellness, prevention, and health education
7. Never provide diagnoses or specific treatment plans

Current conversation context: {context}

User's question: {message}

Please provide a helpful, empathetic response that follows the above guidelines."
    )
}

pub fn render_context(history: &[Exchange]) -> String {
    if history.is_empty() {
        return NO_PREVIOUS_CONVERSATION.to_string();
    }

    history_window(history)
        .iter()
        .map(|ex| format!("User: {}\nAssistant: {}", ex.user, ex.bot))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn history_window(history: &[Exchange]) -> &[Exchange] {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    &history[start..]
}
