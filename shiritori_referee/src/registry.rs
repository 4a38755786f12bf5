// Per-room game store.
//
// Each room's `RoomGame` sits behind its own mutex, and the map from room
// id to mutex is a sharded `DashMap`. `with_room` holds a map shard only
// long enough to clone the room's `Arc` out, then runs the caller's closure
// under that room's lock alone. Events for one room are serialized; events
// for different rooms never wait on each other (beyond a shard lookup).
//
// Rooms are created on first contact, in `NoGame`, with a `GameRng` seeded
// from the registry's base seed plus a creation counter. Rooms are never
// evicted; state lives for the process lifetime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use shiritori_prng::GameRng;
use shiritori_protocol::RoomId;

use crate::room::RoomGame;

pub struct RoomRegistry {
    rooms: DashMap<RoomId, Arc<Mutex<RoomGame>>>,
    base_seed: u64,
    next_room: AtomicU64,
}

impl RoomRegistry {
    pub fn new(base_seed: u64) -> Self {
        Self {
            rooms: DashMap::new(),
            base_seed,
            next_room: AtomicU64::new(0),
        }
    }

    /// Run `f` with exclusive access to the room, creating it if needed.
    pub fn with_room<R>(&self, room_id: &RoomId, f: impl FnOnce(&mut RoomGame) -> R) -> R {
        let room = self.room(room_id);
        let mut game = room.lock();
        f(&mut game)
    }

    fn room(&self, room_id: &RoomId) -> Arc<Mutex<RoomGame>> {
        if let Some(room) = self.rooms.get(room_id) {
            return Arc::clone(room.value());
        }
        let entry = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            let n = self.next_room.fetch_add(1, Ordering::Relaxed);
            let rng = GameRng::new(self.base_seed.wrapping_add(n));
            Arc::new(Mutex::new(RoomGame::new(rng)))
        });
        Arc::clone(entry.value())
    }

    /// Number of rooms seen so far.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
