use super::message::{Message, Role};

/// Append-only record of a chat session.
///
/// The system prompt is held apart from the turn history: it is never part of
/// [`Conversation::snapshot`] and any context built from this conversation
/// starts with it. Nothing in here ever shortens the history; bounding what is
/// sent to the model is the job of a [`crate::budget::ContextStrategy`].
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    system_prompt: Option<Message>,
    history: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    ///
    /// A blank or whitespace-only `system_prompt` means "no system prompt".
    pub fn new(system_prompt: &str) -> Self {
        let system_prompt = if system_prompt.trim().is_empty() {
            None
        } else {
            Some(Message::system(system_prompt))
        };

        Self {
            system_prompt,
            history: Vec::new(),
        }
    }

    /// Record a message stamped with the current time.
    pub fn append(&mut self, role: impl Into<Role>, content: impl Into<String>) {
        self.history.push(Message::new(role, content));
    }

    /// Owned copy of the history, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.history.clone()
    }

    pub fn system_prompt(&self) -> Option<&Message> {
        self.system_prompt.as_ref()
    }

    /// Borrowed view of the history for read-only consumers such as a
    /// context strategy.
    pub fn messages(&self) -> &[Message] {
        &self.history
    }

    pub fn last(&self) -> Option<&Message> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_preserves_append_order() {
        let mut conversation = Conversation::new("");
        for i in 0..25 {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            conversation.append(role, format!("message {i}"));
        }

        let snapshot = conversation.snapshot();
        assert_eq!(snapshot.len(), 25);
        for (i, message) in snapshot.iter().enumerate() {
            assert_eq!(message.content(), format!("message {i}"));
        }
    }

    #[test]
    fn snapshot_is_independent_of_the_store() {
        let mut conversation = Conversation::new("");
        conversation.append(Role::User, "first");

        let mut snapshot = conversation.snapshot();
        snapshot.clear();
        snapshot.push(Message::user("injected"));

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].content(), "first");
    }

    #[test]
    fn whitespace_system_prompt_is_treated_as_absent() {
        assert!(Conversation::new("").system_prompt().is_none());
        assert!(Conversation::new("   \n\t ").system_prompt().is_none());
    }

    #[test]
    fn system_prompt_is_not_part_of_history() {
        let conversation = Conversation::new("be concise");

        let system = conversation.system_prompt().expect("system prompt");
        assert_eq!(system.role(), &Role::System);
        assert_eq!(system.content(), "be concise");
        assert!(conversation.is_empty());
        assert!(conversation.snapshot().is_empty());
    }

    #[test]
    fn append_accepts_arbitrary_roles() {
        let mut conversation = Conversation::new("");
        conversation.append("critic", "looks fine");

        let last = conversation.last().expect("one message");
        assert_eq!(last.role(), &Role::Other("critic".to_string()));
    }
}
