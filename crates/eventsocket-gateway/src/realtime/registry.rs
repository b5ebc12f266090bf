use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::realtime::connection::{Connection, ConnectionId};

#[derive(Default)]
struct Table {
    next_id: ConnectionId,
    live: BTreeMap<ConnectionId, Connection>,
}

/// Live connection set plus the id counter.
///
/// One mutex guards both, so issuing an id, inserting, removing and taking a
/// snapshot are mutually exclusive. No await happens under the lock.
#[derive(Default)]
pub struct ConnectionRegistry {
    table: Mutex<Table>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // Nothing under the lock can leave the table half-updated.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue the next id and add the new connection to the live set.
    pub fn register(&self, url_param: String, tx: mpsc::Sender<String>) -> Connection {
        let mut t = self.lock();
        let id = t.next_id;
        t.next_id += 1;
        let conn = Connection::new(id, url_param, tx);
        t.live.insert(id, conn.clone());
        conn
    }

    /// Remove from the live set. Returns false if it was not there.
    pub fn remove(&self, conn: &Connection) -> bool {
        let mut t = self.lock();
        // same id from another router is not ours
        let present = t.live.get(&conn.id()).is_some_and(|existing| existing == conn);
        if present {
            t.live.remove(&conn.id());
        }
        present
    }

    pub fn get(&self, id: ConnectionId) -> Option<Connection> {
        self.lock().live.get(&id).cloned()
    }

    /// Id-ordered copy of the live set.
    pub fn snapshot(&self) -> Vec<Connection> {
        self.lock().live.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().live.is_empty()
    }
}
