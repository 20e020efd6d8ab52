//! WebSocket endpoint.
//!
//! `GET /ws?room=<name>` upgrades the connection and drives one relay loop
//! for its lifetime. This module is the transport boundary: it resolves the
//! room identifier (absent parameter → the default room, exactly once, here),
//! adapts the socket's read half into the core's [`Inbound`] stream, and runs
//! a writer task that forwards the peer's outbound queue to the socket.

use std::future::Future;

use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use beacon_core::{Inbound, PeerHandle, PeerId, RoomName, run_relay};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::AppState;

/// Connection-setup parameters for the `/ws` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct WsQuery {
    room: Option<String>,
}

/// Upgrade handler for `GET /ws`.
// axum's Handler is only implemented for async functions.
#[allow(clippy::unused_async)]
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    let room = RoomName::resolve(query.room.as_deref());
    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

/// Drive one accepted connection: writer task plus relay loop, then teardown.
async fn handle_socket(socket: WebSocket, room: RoomName, state: AppState) {
    let peer_id = PeerId::next();
    let (handle, outbound) = PeerHandle::channel(peer_id);
    let (sink, stream) = socket.split();

    tracing::debug!(peer = %peer_id, room = %room, "connection established");

    let writer = tokio::spawn(write_outbound(sink, outbound));
    run_relay(&state.registry, &room, handle, WsInbound { stream }).await;

    // The relay loop has left the room, so the remote is gone; anything still
    // queued for it is an accepted best-effort loss.
    writer.abort();
    let _ = writer.await;
    tracing::debug!(peer = %peer_id, room = %room, "connection closed");
}

/// Forward a peer's outbound queue to its socket as text frames.
///
/// Returns when the queue closes or a write fails; returning drops the
/// receiver, so later broadcast sends to this peer fail and get suppressed.
async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::UnboundedReceiver<Utf8Bytes>,
) {
    while let Some(payload) = outbound.recv().await {
        if sink.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }
}

/// The socket's read half, seen through the core's transport seam.
struct WsInbound {
    stream: SplitStream<WebSocket>,
}

impl Inbound for WsInbound {
    type Payload = Utf8Bytes;

    fn next_message(&mut self) -> impl Future<Output = Option<Utf8Bytes>> + Send {
        async {
            while let Some(frame) = self.stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => return Some(text),
                    // Close frames and read errors end the relay identically.
                    Ok(Message::Close(_)) | Err(_) => return None,
                    // This is a text relay; a binary frame ends the
                    // connection rather than being silently dropped.
                    Ok(Message::Binary(_)) => {
                        tracing::debug!("binary frame on text relay, closing");
                        return None;
                    },
                    // axum answers pings itself.
                    Ok(Message::Ping(_) | Message::Pong(_)) => {},
                }
            }
            None
        }
    }
}
