//! Per-event context threaded through every window operation.

use sqlx::SqliteConnection;
use transport_core::{Transport, UserId};

use crate::registry::Registry;
use crate::token::TypeTag;

/// Owner value stored for windows anyone may use.
pub const ANYONE: i64 = 0;

/// Owner value stored for windows opened by an anonymous chat admin.
pub const ANONYMOUS: i64 = -1;

/// Who may interact with a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Anyone,
    Anonymous,
    User(UserId),
}

impl Owner {
    /// Stored representation.
    pub fn to_stored(self) -> i64 {
        match self {
            Owner::Anyone => ANYONE,
            Owner::Anonymous => ANONYMOUS,
            Owner::User(id) => id,
        }
    }

    pub fn from_stored(value: i64) -> Self {
        match value {
            ANYONE => Owner::Anyone,
            ANONYMOUS => Owner::Anonymous,
            id => Owner::User(id),
        }
    }

    /// The owner representing the sender of an event, anonymous when the
    /// platform withheld the sender.
    pub fn actor(user_id: Option<UserId>) -> Self {
        user_id.map(Owner::User).unwrap_or(Owner::Anonymous)
    }
}

/// What the current inbound event carries.
#[derive(Debug, Clone, Default)]
pub struct EventScope {
    /// Sender of the event, if the platform disclosed one.
    pub user_id: Option<UserId>,
    /// Payload of the tapped button, for callback events.
    pub callback_data: Option<Vec<u8>>,
}

impl EventScope {
    pub fn callback(user_id: UserId, data: Vec<u8>) -> Self {
        Self {
            user_id: Some(user_id),
            callback_data: Some(data),
        }
    }

    pub fn message(user_id: Option<UserId>) -> Self {
        Self {
            user_id,
            callback_data: None,
        }
    }

    pub fn is_callback(&self) -> bool {
        self.callback_data.is_some()
    }
}

/// Collaborators and event data for one inbound event.
///
/// `conn` is normally the connection of the event's transaction.
pub struct GuiContext<'a> {
    pub conn: &'a mut SqliteConnection,
    pub transport: &'a dyn Transport,
    pub registry: &'a Registry,
    pub event: EventScope,
    /// Resend the window message after processing text input, unless the
    /// window kind says otherwise.
    pub resend_after_input: bool,
}

impl<'a> GuiContext<'a> {
    pub fn new(
        conn: &'a mut SqliteConnection,
        transport: &'a dyn Transport,
        registry: &'a Registry,
        event: EventScope,
    ) -> Self {
        Self {
            conn,
            transport,
            registry,
            event,
            resend_after_input: true,
        }
    }
}

/// Identifiers of the window a widget belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRef {
    pub id: i64,
    pub chat_id: i64,
    pub tag: TypeTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_round_trip() {
        for owner in [Owner::Anyone, Owner::Anonymous, Owner::User(42)] {
            assert_eq!(Owner::from_stored(owner.to_stored()), owner);
        }
        assert_eq!(Owner::Anyone.to_stored(), 0);
        assert_eq!(Owner::Anonymous.to_stored(), -1);
    }

    #[test]
    fn test_actor() {
        assert_eq!(Owner::actor(Some(7)), Owner::User(7));
        assert_eq!(Owner::actor(None), Owner::Anonymous);
    }

    #[test]
    fn test_event_scope() {
        assert!(EventScope::callback(1, vec![1, 2]).is_callback());
        assert!(!EventScope::message(Some(1)).is_callback());
    }
}
