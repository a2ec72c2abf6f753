// src/refcache.rs
// =============================================================================
// Remembers the HTTP status of every external URL probed during a run.
//
// The same external URL often shows up hundreds of times across a site
// (navigation bars, footers...). Only the first occurrence goes over the
// network; the rest read the stored status.
//
// How it works:
// - Each URL has a slot: either a known status, or a probe in flight
// - The first task to ask for a URL becomes the leader and runs the probe
// - Tasks asking for the same URL meanwhile subscribe to the leader's
//   `watch` channel and get its outcome, success or failure
// - Only successes are stored. A failure empties the slot, so the next
//   occurrence after it tries again
//
// The map lock is a plain std Mutex: it is only held to read or update a
// slot, never across an .await.
// =============================================================================

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tokio::sync::watch;

type Outcome<E> = Option<Result<u16, E>>;

#[derive(Debug)]
enum Slot<E> {
    Known(u16),
    InFlight(watch::Receiver<Outcome<E>>),
}

// What a caller does after looking at the slot
enum Role<E> {
    Lead(watch::Sender<Outcome<E>>),
    Follow(watch::Receiver<Outcome<E>>),
}

#[derive(Debug)]
pub struct RefCache<E> {
    entries: Mutex<HashMap<String, Slot<E>>>,
}

impl<E> Default for RefCache<E> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<E: Clone> RefCache<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached status for `key`, if a probe for it has succeeded
    pub fn get(&self, key: &str) -> Option<u16> {
        match self.lock().get(key) {
            Some(Slot::Known(status)) => Some(*status),
            _ => None,
        }
    }

    /// Returns the cached status for `key`, running `probe` to get it if
    /// nobody has yet.
    ///
    /// Callers arriving while a probe for the same key is running share
    /// its outcome, including an error. Errors are not stored.
    pub async fn get_or_probe<F, Fut>(&self, key: &str, probe: F) -> Result<u16, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u16, E>>,
    {
        loop {
            let role = {
                let mut entries = self.lock();
                let role = match entries.get(key) {
                    Some(Slot::Known(status)) => return Ok(*status),
                    // A closed channel means the leader was dropped mid-probe
                    Some(Slot::InFlight(rx)) if rx.has_changed().is_ok() => {
                        Role::Follow(rx.clone())
                    }
                    _ => {
                        let (tx, rx) = watch::channel(None);
                        entries.insert(key.to_string(), Slot::InFlight(rx));
                        Role::Lead(tx)
                    }
                };
                role
            };

            match role {
                Role::Lead(tx) => {
                    let outcome = probe().await;
                    {
                        let mut entries = self.lock();
                        match &outcome {
                            Ok(status) => {
                                entries.insert(key.to_string(), Slot::Known(*status));
                            }
                            Err(_) => {
                                entries.remove(key);
                            }
                        }
                    }
                    // Nobody listening is fine
                    let _ = tx.send(Some(outcome.clone()));
                    return outcome;
                }
                Role::Follow(mut rx) => {
                    let shared = rx
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|outcome| (*outcome).clone());
                    if let Some(outcome) = shared {
                        return outcome;
                    }
                    // Leader went away without an answer; look again
                }
            }
        }
    }

    /// Number of URLs with a known status
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Known(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot<E>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
