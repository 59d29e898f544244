use shared::{ChatMessage, ChatSender};

pub fn render(messages: &[ChatMessage]) -> Vec<String> {
    messages
        .iter()
        .map(|message| match message.sender {
            ChatSender::User => format!("You: {}", message.text),
            ChatSender::Assistant => format!("CrediWise AI: {}", message.text),
        })
        .collect()
}
