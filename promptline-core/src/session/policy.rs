use crate::config::SessionSettings;
use crate::protocol::{Message, MessageRole};

/// Which part of the stored history is sent with the next turn.
/// The stored history itself is never trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPolicy {
    /// Send everything
    #[default]
    Unbounded,
    /// Send at most the last `n` messages
    KeepLastMessages(usize),
}

impl HistoryPolicy {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        match settings.max_history_messages {
            Some(n) => HistoryPolicy::KeepLastMessages(n),
            None => HistoryPolicy::Unbounded,
        }
    }

    /// The slice of `history` to send.
    ///
    /// A window never opens on a tool result whose tool call was cut off;
    /// such results are dropped along with the call.
    pub fn window<'a>(&self, history: &'a [Message]) -> &'a [Message] {
        match *self {
            HistoryPolicy::Unbounded => history,
            HistoryPolicy::KeepLastMessages(n) => {
                let mut start = history.len().saturating_sub(n);
                while start < history.len() && history[start].role == MessageRole::Tool {
                    start += 1;
                }
                &history[start..]
            }
        }
    }
}
