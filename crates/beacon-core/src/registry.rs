//! Room registry.
//!
//! Process-wide membership bookkeeping, independent of message content.
//!
//! ## Responsibilities
//!
//! - Membership: track which live connections belong to which room
//! - Snapshots: hand relay loops a stable member set to broadcast over
//! - Lifecycle: create rooms on first join, drop them on last leave
//!
//! ## Design
//!
//! - Explicitly constructed and shared by handle, never a module-level
//!   global, so tests can run isolated registries side by side
//! - One coarse `RwLock` over the whole map; every operation is O(room size)
//!   and no lock is held across an await point
//! - A snapshot taken concurrently with a join/leave on the same room
//!   reflects either the pre- or post-mutation state, never a torn one

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::peer::{PeerHandle, PeerId};
use crate::room::RoomName;

type Rooms<P> = HashMap<RoomName, HashMap<PeerId, PeerHandle<P>>>;

/// Process-wide mapping from room name to current member connections.
pub struct RoomRegistry<P> {
    rooms: RwLock<Rooms<P>>,
}

impl<P> RoomRegistry<P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { rooms: RwLock::new(HashMap::new()) }
    }

    // Membership mutations are single writes under the lock; a poisoning
    // panic cannot leave the map torn, so the guard is safe to recover.
    fn read(&self) -> RwLockReadGuard<'_, Rooms<P>> {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rooms<P>> {
        self.rooms.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a connection to a room, creating the room if absent.
    ///
    /// Joining twice with the same peer id replaces the entry with an
    /// equivalent handle, so a duplicate join is observably a no-op.
    pub fn join(&self, room: RoomName, peer: PeerHandle<P>) {
        let peer_id = peer.id();
        self.write().entry(room.clone()).or_default().insert(peer_id, peer);
        tracing::debug!(peer = %peer_id, room = %room, "peer joined room");
    }

    /// Remove a connection from a room.
    ///
    /// A no-op when the room or the membership does not exist; safe to call
    /// whether or not the corresponding join was ever observed. The room is
    /// dropped when its last member leaves.
    pub fn leave(&self, room: &RoomName, peer: PeerId) {
        let mut rooms = self.write();
        if let Some(members) = rooms.get_mut(room) {
            if members.remove(&peer).is_some() {
                tracing::debug!(peer = %peer, room = %room, "peer left room");
            }
            if members.is_empty() {
                rooms.remove(room);
            }
        }
    }

    /// An owned copy of a room's current member set.
    ///
    /// Empty for unknown rooms; never fails. The copy is stable: the caller
    /// can iterate it while members join and leave underneath.
    pub fn snapshot(&self, room: &RoomName) -> Vec<PeerHandle<P>> {
        self.read().get(room).map_or_else(Vec::new, |members| members.values().cloned().collect())
    }

    /// Whether a room currently exists (has at least one member).
    pub fn has_room(&self, room: &RoomName) -> bool {
        self.read().contains_key(room)
    }

    /// Whether a connection is currently a member of a room.
    pub fn is_member(&self, room: &RoomName, peer: PeerId) -> bool {
        self.read().get(room).is_some_and(|members| members.contains_key(&peer))
    }

    /// Number of members currently in a room; zero for unknown rooms.
    pub fn member_count(&self, room: &RoomName) -> usize {
        self.read().get(room).map_or(0, HashMap::len)
    }

    /// Number of rooms with at least one member.
    pub fn room_count(&self) -> usize {
        self.read().len()
    }
}

impl<P> Default for RoomRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for RoomRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry").field("room_count", &self.room_count()).finish()
    }
}
