//! Room registry tests.

use std::collections::{HashMap, HashSet};

use beacon_core::{PeerHandle, PeerId, RoomName, RoomRegistry};
use proptest::prelude::*;

fn handle() -> (PeerHandle<String>, tokio::sync::mpsc::UnboundedReceiver<String>) {
    PeerHandle::channel(PeerId::next())
}

#[test]
fn new_registry_has_no_rooms() {
    let registry = RoomRegistry::<String>::new();
    assert_eq!(registry.room_count(), 0);
    assert!(!registry.has_room(&RoomName::from("alpha")));
}

#[test]
fn join_creates_room_and_membership() {
    let registry = RoomRegistry::new();
    let room = RoomName::from("alpha");
    let (peer, _rx) = handle();
    let peer_id = peer.id();

    registry.join(room.clone(), peer);

    assert!(registry.has_room(&room));
    assert!(registry.is_member(&room, peer_id));
    assert_eq!(registry.member_count(&room), 1);
}

#[test]
fn join_then_leave_is_empty_in_empty_out() {
    let registry = RoomRegistry::new();
    let room = RoomName::from("alpha");
    let (peer, _rx) = handle();
    let peer_id = peer.id();

    registry.join(room.clone(), peer);
    registry.leave(&room, peer_id);

    assert!(!registry.has_room(&room));
    assert_eq!(registry.member_count(&room), 0);
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn leave_restores_prior_membership() {
    let registry = RoomRegistry::new();
    let room = RoomName::from("alpha");
    let (resident, _rx_resident) = handle();
    let resident_id = resident.id();
    registry.join(room.clone(), resident);

    let (visitor, _rx_visitor) = handle();
    let visitor_id = visitor.id();
    registry.join(room.clone(), visitor);
    registry.leave(&room, visitor_id);

    assert_eq!(registry.member_count(&room), 1);
    assert!(registry.is_member(&room, resident_id));
    assert!(!registry.is_member(&room, visitor_id));
}

#[test]
fn leave_unknown_room_is_noop() {
    let registry = RoomRegistry::<String>::new();
    registry.leave(&RoomName::from("ghost"), PeerId::next());
    assert_eq!(registry.room_count(), 0);
}

#[test]
fn leave_twice_matches_leaving_once() {
    let registry = RoomRegistry::new();
    let room = RoomName::from("alpha");
    let (stayer, _rx_stayer) = handle();
    registry.join(room.clone(), stayer);

    let (leaver, _rx_leaver) = handle();
    let leaver_id = leaver.id();
    registry.join(room.clone(), leaver);

    registry.leave(&room, leaver_id);
    let after_once = registry.member_count(&room);
    registry.leave(&room, leaver_id);

    assert_eq!(registry.member_count(&room), after_once);
    assert_eq!(after_once, 1);
}

#[test]
fn duplicate_join_is_noop() {
    let registry = RoomRegistry::new();
    let room = RoomName::from("alpha");
    let (peer, _rx) = handle();
    let peer_id = peer.id();

    registry.join(room.clone(), peer.clone());
    registry.join(room.clone(), peer);

    assert_eq!(registry.member_count(&room), 1);
    assert!(registry.is_member(&room, peer_id));
}

#[test]
fn snapshot_unknown_room_is_empty() {
    let registry = RoomRegistry::<String>::new();
    assert!(registry.snapshot(&RoomName::from("ghost")).is_empty());
}

#[test]
fn snapshot_is_a_stable_copy() {
    let registry = RoomRegistry::new();
    let room = RoomName::from("alpha");
    let (a, _rx_a) = handle();
    let (b, _rx_b) = handle();
    let a_id = a.id();
    registry.join(room.clone(), a);
    registry.join(room.clone(), b);

    let snapshot = registry.snapshot(&room);
    registry.leave(&room, a_id);

    // The copy taken before the leave still holds both handles; the registry
    // itself has moved on.
    assert_eq!(snapshot.len(), 2);
    assert_eq!(registry.member_count(&room), 1);
}

#[test]
fn distinct_rooms_are_independent() {
    let registry = RoomRegistry::new();
    let alpha = RoomName::from("alpha");
    let beta = RoomName::from("beta");
    let (a, _rx_a) = handle();
    let (b, _rx_b) = handle();
    let a_id = a.id();
    let b_id = b.id();

    registry.join(alpha.clone(), a);
    registry.join(beta.clone(), b);

    assert!(registry.is_member(&alpha, a_id));
    assert!(!registry.is_member(&alpha, b_id));
    assert!(registry.is_member(&beta, b_id));
    assert!(!registry.is_member(&beta, a_id));
    assert_eq!(registry.room_count(), 2);
}

proptest! {
    /// After any interleaving of joins and leaves the registry agrees with a
    /// naive model: same rooms, same member sets, no phantom members.
    #[test]
    fn registry_matches_naive_model(
        ops in prop::collection::vec((any::<bool>(), 0usize..5, 0usize..3), 0..40),
    ) {
        let rooms: Vec<RoomName> =
            ["alpha", "beta", "gamma"].iter().map(|r| RoomName::from(*r)).collect();
        let peers: Vec<(PeerHandle<String>, _)> =
            (0..5).map(|_| handle()).collect();

        let registry = RoomRegistry::new();
        let mut model: HashMap<usize, HashSet<PeerId>> = HashMap::new();

        for (is_join, peer_idx, room_idx) in ops {
            let peer_id = peers[peer_idx].0.id();
            if is_join {
                registry.join(rooms[room_idx].clone(), peers[peer_idx].0.clone());
                model.entry(room_idx).or_default().insert(peer_id);
            } else {
                registry.leave(&rooms[room_idx], peer_id);
                if let Some(members) = model.get_mut(&room_idx) {
                    members.remove(&peer_id);
                    if members.is_empty() {
                        model.remove(&room_idx);
                    }
                }
            }
        }

        prop_assert_eq!(registry.room_count(), model.len());
        for (room_idx, room) in rooms.iter().enumerate() {
            let expected = model.get(&room_idx).cloned().unwrap_or_default();
            let actual: HashSet<PeerId> =
                registry.snapshot(room).iter().map(PeerHandle::id).collect();
            prop_assert_eq!(&actual, &expected, "room {} diverged", room);
            prop_assert_eq!(registry.has_room(room), !expected.is_empty());
        }
    }
}
