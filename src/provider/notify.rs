//! In-process change notifications keyed by address.
//!
//! Publishing never blocks: each observer owns an unbounded channel, and an
//! observer whose `Subscription` was dropped is pruned on the next publish.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::trace;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    /// The address the mutation was issued against.
    pub address: Url,
}

struct Observer {
    address: Url,
    descendants: bool,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl Observer {
    /// A change reaches observers on the address itself and everything below
    /// it; observers above it hear it only when they asked for descendants.
    fn wants(&self, changed: &Url) -> bool {
        self.address == *changed
            || is_below(&self.address, changed)
            || (self.descendants && is_below(changed, &self.address))
    }
}

/// `child` lies strictly under `parent`, at a path-segment boundary.
fn is_below(child: &Url, parent: &Url) -> bool {
    let base = parent.as_str().trim_end_matches('/');
    child
        .as_str()
        .strip_prefix(base)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Cloneable registry shared by the provider and everything that subscribes.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    observers: Arc<Mutex<Vec<Observer>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe mutations issued against `address` or any address above it.
    pub fn subscribe(&self, address: &Url) -> Subscription {
        self.register(address, false)
    }

    /// Like `subscribe`, and also hear mutations against any address below
    /// `address` (a collection observer hears about its items).
    pub fn subscribe_descendants(&self, address: &Url) -> Subscription {
        self.register(address, true)
    }

    /// Deliver one event to every matching observer. Returns how many received it.
    pub fn notify_change(&self, address: &Url) -> usize {
        let event = ChangeEvent {
            address: address.clone(),
        };
        let mut delivered = 0;
        self.lock().retain(|observer| {
            if observer.tx.is_closed() {
                return false;
            }
            if observer.wants(address) && observer.tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
            true
        });
        trace!(address = %address, delivered, "change notified");
        delivered
    }

    /// Live observers, counting ones whose subscription was dropped since the last publish.
    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    fn register(&self, address: &Url, descendants: bool) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(Observer {
            address: address.clone(),
            descendants,
            tx,
        });
        Subscription {
            address: address.clone(),
            rx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Observer>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of a registration. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    address: Url,
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl Subscription {
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Wait for the next change. `None` once the notifier is gone.
    pub async fn changed(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Next change if one is already queued.
    pub fn try_changed(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Drop everything queued and return how many events were pending.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while self.rx.try_recv().is_ok() {
            n += 1;
        }
        n
    }
}
