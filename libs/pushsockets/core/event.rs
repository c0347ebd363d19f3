use crate::traits::WsMessage;

/// Events delivered by an open push channel, in receipt order
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A text or binary frame from the server
    Frame(WsMessage),
    /// Transport error; the channel is unusable afterwards
    Error(String),
    /// Orderly or abrupt close, with the close reason if the server sent one
    Closed(Option<String>),
}

impl ChannelEvent {
    /// True for events after which no further frames will arrive
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChannelEvent::Error(_) | ChannelEvent::Closed(_))
    }
}
