//! Plain-text prompt rendering for in-process models.

use ragkit_core::{ChatMessage, MessageRole};

/// Turn label used when a conversation is flattened to text.
fn label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "System",
        MessageRole::User => "Human",
        MessageRole::Assistant => "AI",
    }
}

/// Render a conversation as `Role: text` lines followed by an open `AI:` turn.
pub fn render_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str(label(message.role));
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }
    prompt.push_str("AI:");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conversation_is_flattened() {
        let messages = vec![
            ChatMessage::system("Answer in one word."),
            ChatMessage::user("Capital of France?"),
            ChatMessage::assistant("Paris"),
            ChatMessage::user("And Italy?"),
        ];

        assert_eq!(
            render_prompt(&messages),
            "System: Answer in one word.\nHuman: Capital of France?\nAI: Paris\nHuman: And Italy?\nAI:"
        );
    }

    #[test]
    fn test_empty_conversation_still_opens_a_turn() {
        assert_eq!(render_prompt(&[]), "AI:");
    }
}
