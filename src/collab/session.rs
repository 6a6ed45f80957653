//! Local view of a collaboration session.

use std::collections::BTreeMap;

use tokio::sync::mpsc;

use super::protocol::{InboundEvent, OutboundEvent};
use crate::config::CollabConfig;
use crate::context::AppWorkspace;
use crate::graph::{Toggle, Workspace};
use crate::models::Position;

/// A remote participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    pub user_id: String,
    pub username: String,
    /// Last reported 3D cursor.
    pub cursor: Option<Position>,
    /// Last node the peer selected.
    pub selected_node: Option<String>,
}

impl Peer {
    fn new(user_id: &str, username: Option<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.unwrap_or_else(|| default_username(user_id)),
            cursor: None,
            selected_node: None,
        }
    }
}

/// Collaboration state for the local user.
///
/// Inbound events update peers and, for `graph_updated`, the workspace.
/// Outbound helpers return `None` until a session is joined.
#[derive(Debug, Clone)]
pub struct CollabSession {
    user_id: String,
    username: String,
    session_id: Option<String>,
    peers: BTreeMap<String, Peer>,
}

impl CollabSession {
    /// New identity with a random `user_<suffix>` id.
    pub fn new(username: Option<String>) -> Self {
        let ulid = ulid::Ulid::new().to_string().to_lowercase();
        let user_id = format!("user_{}", &ulid[ulid.len() - 10..]);
        Self::with_user_id(user_id, username)
    }

    /// New identity announced under the configured `user_name`.
    pub fn from_config(config: &CollabConfig) -> Self {
        Self::new(config.user_name.clone())
    }

    pub fn with_user_id(user_id: impl Into<String>, username: Option<String>) -> Self {
        let user_id = user_id.into();
        Self {
            username: username.unwrap_or_else(|| default_username(&user_id)),
            user_id,
            session_id: None,
            peers: BTreeMap::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_joined(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn peers(&self) -> impl Iterator<Item = &Peer> {
        self.peers.values()
    }

    pub fn peer(&self, user_id: &str) -> Option<&Peer> {
        self.peers.get(user_id)
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    /// Apply a peer event. Returns `false` for events echoed from the local user.
    pub fn apply(&mut self, event: InboundEvent, workspace: &mut Workspace) -> bool {
        if event.user_id() == Some(self.user_id.as_str()) {
            return false;
        }

        match event {
            InboundEvent::UserJoined { user_id, username } => {
                tracing::info!("{} joined the session", username.as_deref().unwrap_or(&user_id));
                self.peers
                    .insert(user_id.clone(), Peer::new(&user_id, username));
            }
            InboundEvent::UserLeft { user_id, .. } => {
                if let Some(peer) = self.peers.remove(&user_id) {
                    tracing::info!("{} left the session", peer.username);
                }
            }
            InboundEvent::CursorUpdate { user_id, position } => {
                self.peer_entry(&user_id).cursor = Some(position);
            }
            InboundEvent::NodeSelected { user_id, node_id } => {
                let known = workspace
                    .current_graph()
                    .is_some_and(|g| g.contains_node(&node_id));
                if !known {
                    tracing::debug!("{} selected {} which is not shown here", user_id, node_id);
                }
                self.peer_entry(&user_id).selected_node = Some(node_id);
            }
            InboundEvent::GraphUpdated {
                user_id,
                graph_data,
            } => match graph_data {
                Some(graph) => {
                    tracing::info!("Graph updated by {}", user_id);
                    workspace.load(graph);
                }
                None => tracing::debug!("Graph update from {} carried no graph", user_id),
            },
            InboundEvent::SessionMessage { payload, .. } => {
                tracing::info!("Session message: {}", serde_json::Value::Object(payload));
            }
        }
        true
    }

    /// Peers can send cursor or selection events before `user_joined`.
    fn peer_entry(&mut self, user_id: &str) -> &mut Peer {
        self.peers
            .entry(user_id.to_string())
            .or_insert_with(|| Peer::new(user_id, None))
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Join (or switch to) a session.
    pub fn join(&mut self, session_id: impl Into<String>) -> OutboundEvent {
        let session_id = session_id.into();
        if self.session_id.as_deref() != Some(session_id.as_str()) {
            self.peers.clear();
        }
        self.session_id = Some(session_id.clone());
        tracing::info!("Joined session {}", session_id);

        OutboundEvent::JoinSession {
            session_id,
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }

    /// Leave the current session, forgetting all peers.
    pub fn leave(&mut self) -> Option<OutboundEvent> {
        let session_id = self.session_id.take()?;
        self.peers.clear();
        tracing::info!("Left session {}", session_id);

        Some(OutboundEvent::LeaveSession {
            session_id,
            user_id: self.user_id.clone(),
        })
    }

    pub fn cursor_moved(&self, position: Position) -> Option<OutboundEvent> {
        Some(OutboundEvent::CursorMove {
            session_id: self.session_id.clone()?,
            user_id: self.user_id.clone(),
            position,
        })
    }

    /// Mirror a local toggle. Only selections are broadcast.
    pub fn selection_toggled(&self, node_id: &str, toggle: Toggle) -> Option<OutboundEvent> {
        if !toggle.selected {
            return None;
        }
        Some(OutboundEvent::SelectNode {
            session_id: self.session_id.clone()?,
            user_id: self.user_id.clone(),
            node_id: node_id.to_string(),
        })
    }

    /// Broadcast the workspace's current graph, e.g. after a layout change.
    pub fn graph_changed(&self, workspace: &Workspace) -> Option<OutboundEvent> {
        let session_id = self.session_id.clone()?;
        let graph = workspace.current_graph()?;
        Some(OutboundEvent::UpdateGraph {
            session_id,
            user_id: self.user_id.clone(),
            graph_data: graph.clone(),
        })
    }
}

fn default_username(user_id: &str) -> String {
    let tail = user_id
        .char_indices()
        .rev()
        .nth(3)
        .map_or(user_id, |(i, _)| &user_id[i..]);
    format!("User_{tail}")
}

/// Apply inbound events to the shared workspace until the channel closes.
pub async fn run_inbound(
    mut session: CollabSession,
    workspace: AppWorkspace,
    mut events: mpsc::Receiver<InboundEvent>,
) -> CollabSession {
    while let Some(event) = events.recv().await {
        let mut ws = workspace.lock().await;
        session.apply(event, &mut ws);
    }
    tracing::debug!("Collaboration channel closed");
    session
}
