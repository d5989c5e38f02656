use crate::llm::{Message, Role};

/// Bounded conversation history.
///
/// When the message count exceeds the cap, the oldest non-system messages are
/// dropped. The system prompt always survives trimming so the agent keeps its
/// instructions across long runs.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<Message>,
    max_messages: usize,
}

impl ConversationHistory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
        self.trim_if_needed();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn trim_if_needed(&mut self) {
        while self.messages.len() > self.max_messages {
            let Some(remove_at) = self.messages.iter().position(|m| m.role != Role::System)
            else {
                return;
            };

            // An assistant message with tool calls and its tool results form
            // one unit; providers reject tool results without the matching
            // assistant turn, so the whole group goes at once.
            let mut remove_to = remove_at + 1;
            if self.messages[remove_at].tool_calls.is_some() {
                while remove_to < self.messages.len()
                    && self.messages[remove_to].role == Role::Tool
                {
                    remove_to += 1;
                }
            }
            self.messages.drain(remove_at..remove_to);
        }
    }
}
