//! Transport boundary traits.
//!
//! The relay loop never touches a socket. It consumes an [`Inbound`] stream
//! the transport layer hands it, and delivers through the [`PeerHandle`]s
//! the registry holds.
//!
//! [`PeerHandle`]: crate::peer::PeerHandle

use std::future::Future;

use tokio::sync::mpsc;

/// The receive half of one connection.
///
/// Yields payloads until the connection ends. A graceful disconnect and a
/// read error are the same terminal signal: the relay loop treats both as
/// "this connection is done", so implementations report both as `None`.
pub trait Inbound: Send {
    /// Payload type carried by this stream.
    type Payload: Send;

    /// Wait for the next payload, or `None` once the connection has ended.
    fn next_message(&mut self) -> impl Future<Output = Option<Self::Payload>> + Send;
}

/// Scripted connections for tests and in-process transports: the sender half
/// plays the remote client.
impl<P: Send> Inbound for mpsc::UnboundedReceiver<P> {
    type Payload = P;

    fn next_message(&mut self) -> impl Future<Output = Option<P>> + Send {
        self.recv()
    }
}
