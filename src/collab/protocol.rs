//! Collaboration wire format.
//!
//! Every message is `{"event": <name>, "data": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::models::{Graph, Position};

/// Events received from the collaboration server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    UserJoined {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    UserLeft {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    CursorUpdate {
        user_id: String,
        position: Position,
    },
    NodeSelected {
        user_id: String,
        node_id: String,
    },
    GraphUpdated {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        graph_data: Option<Graph>,
    },
    /// Free-form notice from the server.
    SessionMessage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
        #[serde(flatten)]
        payload: Map<String, JsonValue>,
    },
}

impl InboundEvent {
    /// The peer the event originated from, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            InboundEvent::UserJoined { user_id, .. }
            | InboundEvent::UserLeft { user_id, .. }
            | InboundEvent::CursorUpdate { user_id, .. }
            | InboundEvent::NodeSelected { user_id, .. }
            | InboundEvent::GraphUpdated { user_id, .. } => Some(user_id),
            InboundEvent::SessionMessage { user_id, .. } => user_id.as_deref(),
        }
    }
}

/// Events sent to the collaboration server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    JoinSession {
        session_id: String,
        user_id: String,
        username: String,
    },
    LeaveSession {
        session_id: String,
        user_id: String,
    },
    CursorMove {
        session_id: String,
        user_id: String,
        position: Position,
    },
    SelectNode {
        session_id: String,
        user_id: String,
        node_id: String,
    },
    UpdateGraph {
        session_id: String,
        user_id: String,
        graph_data: Graph,
    },
}

impl OutboundEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::JoinSession { .. } => "join_session",
            OutboundEvent::LeaveSession { .. } => "leave_session",
            OutboundEvent::CursorMove { .. } => "cursor_move",
            OutboundEvent::SelectNode { .. } => "select_node",
            OutboundEvent::UpdateGraph { .. } => "update_graph",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inbound_wire_shape() {
        let event: InboundEvent = serde_json::from_value(json!({
            "event": "cursor_update",
            "data": {"user_id": "user_x", "position": {"x": 1.0, "y": 0.0, "z": -1.0}}
        }))
        .unwrap();

        assert_eq!(event.user_id(), Some("user_x"));
        assert_eq!(
            event,
            InboundEvent::CursorUpdate {
                user_id: "user_x".into(),
                position: Position::new(1.0, 0.0, -1.0),
            }
        );
    }

    #[test]
    fn test_graph_updated_without_graph() {
        let event: InboundEvent = serde_json::from_value(json!({
            "event": "graph_updated",
            "data": {"user_id": "user_y"}
        }))
        .unwrap();
        assert!(matches!(event, InboundEvent::GraphUpdated { graph_data: None, .. }));
    }

    #[test]
    fn test_session_message_decodes() {
        let event: InboundEvent = serde_json::from_value(json!({
            "event": "session_message",
            "data": {"message": "Welcome", "session_id": "room"}
        }))
        .unwrap();

        assert_eq!(event.user_id(), None);
        match event {
            InboundEvent::SessionMessage { payload, .. } => {
                assert_eq!(payload["message"], "Welcome");
                assert_eq!(payload["session_id"], "room");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result = serde_json::from_value::<InboundEvent>(json!({
            "event": "cursor_teleport",
            "data": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_outbound_wire_shape() {
        let event = OutboundEvent::SelectNode {
            session_id: "s1".into(),
            user_id: "user_a".into(),
            node_id: "Bob".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], event.name());
        assert_eq!(value["data"]["node_id"], "Bob");
        assert_eq!(value["data"]["session_id"], "s1");
    }
}
