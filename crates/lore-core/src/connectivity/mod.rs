//! Connectivity tracking.
//!
//! Wraps the platform's reachability signal as an owned component:
//! `ConnectivityHandle` is the write side the platform (or a test) feeds
//! transitions into, `ConnectivityObserver` is the read/subscribe side.
//! Dispatch is edge-triggered: handlers run once per actual transition,
//! never at registration time and never on same-state repeats.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Handler = Box<dyn Fn() + Send + Sync>;

struct Shared {
    online: AtomicBool,
    online_handlers: Mutex<Vec<Handler>>,
    offline_handlers: Mutex<Vec<Handler>>,
}

/// Read/subscribe side of the connectivity signal
#[derive(Clone)]
pub struct ConnectivityObserver {
    shared: Arc<Shared>,
}

/// Write side of the connectivity signal, fed by the platform
#[derive(Clone)]
pub struct ConnectivityHandle {
    shared: Arc<Shared>,
}

impl ConnectivityObserver {
    /// Create an observer/handle pair with the given initial state
    #[must_use]
    pub fn new(initially_online: bool) -> (Self, ConnectivityHandle) {
        let shared = Arc::new(Shared {
            online: AtomicBool::new(initially_online),
            online_handlers: Mutex::new(Vec::new()),
            offline_handlers: Mutex::new(Vec::new()),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            ConnectivityHandle { shared },
        )
    }

    /// Current platform-reported reachability, best-effort
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.shared.online.load(Ordering::SeqCst)
    }

    /// Register a handler for offline -> online transitions
    pub fn on_became_online(&self, handler: impl Fn() + Send + Sync + 'static) {
        lock(&self.shared.online_handlers).push(Box::new(handler));
    }

    /// Register a handler for online -> offline transitions
    pub fn on_became_offline(&self, handler: impl Fn() + Send + Sync + 'static) {
        lock(&self.shared.offline_handlers).push(Box::new(handler));
    }
}

impl ConnectivityHandle {
    /// Report the current reachability; dispatches handlers on a transition
    pub fn set_online(&self, online: bool) {
        let previous = self.shared.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return;
        }

        tracing::debug!(online, "connectivity transition");
        let handlers = if online {
            lock(&self.shared.online_handlers)
        } else {
            lock(&self.shared.offline_handlers)
        };
        for handler in handlers.iter() {
            handler();
        }
    }
}

fn lock(handlers: &Mutex<Vec<Handler>>) -> std::sync::MutexGuard<'_, Vec<Handler>> {
    handlers.lock().unwrap_or_else(PoisonError::into_inner)
}
