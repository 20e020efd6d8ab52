//! Beacon relay core.
//!
//! Room-scoped connection registry and broadcast relay: the piece of a
//! signaling server that tracks which live connections belong to which room
//! and fans a member's messages out to every other member, best-effort.
//! Payloads are opaque; the core performs no parsing, no persistence, no
//! acknowledgment.
//!
//! ## Architecture
//!
//! ```text
//! beacon-core
//!   ├─ RoomRegistry   (room name → member handles, one per process)
//!   ├─ PeerHandle     (identity + outbound queue of one connection)
//!   ├─ run_relay      (per-connection join → relay → leave loop)
//!   └─ Inbound        (transport seam: the receive half of a connection)
//! ```
//!
//! The transport layer accepts connections, resolves each one's room name,
//! and drives [`run_relay`] with an [`Inbound`] stream; everything else is
//! the core's job.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod peer;
mod registry;
mod relay;
mod room;
mod transport;

pub use peer::{DeliveryError, PeerHandle, PeerId};
pub use registry::RoomRegistry;
pub use relay::{BroadcastReport, broadcast, run_relay};
pub use room::{DEFAULT_ROOM, RoomName};
pub use transport::Inbound;
