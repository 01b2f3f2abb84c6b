//! Call-site records and the registry that keeps their enabled bits coherent.
//!
//! Call sites are hit far more often than logger levels change, so each site
//! caches a single enabled bit that the hot path reads with a relaxed atomic
//! load — no lock, no backend query. The registry recomputes every bit in one
//! sweep whenever the backend's configuration changes.

use crate::backend::{Backend, LoggerHandle};
use crate::level::Level;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Slot value marking a site that has not been registered yet.
const UNREGISTERED: usize = usize::MAX;

/// One persistent record per static call site, created lazily on the first
/// execution of its statement and never destroyed before process teardown.
///
/// `const fn new` lets the logging macros declare `static SITE: LogSite`
/// inside each expansion. The handle, level, and slot index are only written
/// under the registry lock; the enabled bit and initialized flag are the
/// lock-free fast path.
#[derive(Debug)]
pub struct LogSite {
    initialized: AtomicBool,
    enabled: AtomicBool,
    handle: AtomicUsize,
    level: AtomicU8,
    slot: AtomicUsize,
}

impl LogSite {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            enabled: AtomicBool::new(false),
            handle: AtomicUsize::new(0),
            level: AtomicU8::new(Level::Info as u8),
            slot: AtomicUsize::new(UNREGISTERED),
        }
    }

    /// Acquire pairs with the release store at the end of registration, so a
    /// thread that observes `true` also observes the resolved handle.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// The cached answer to "would the backend currently accept this site's
    /// level". May be stale between a backend-side change and the next
    /// levels-changed notification; never torn.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Only meaningful once `is_initialized` returns true.
    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        LoggerHandle::from_raw(self.handle.load(Ordering::Relaxed))
    }

    /// The site's configured minimum severity.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_raw(self.level.load(Ordering::Relaxed))
    }
}

impl Default for LogSite {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry entries keep a reference back to the site so a bulk sweep can
/// update the cached bits in registration order.
struct SiteRecord {
    site: &'static LogSite,
}

/// Append-only, index-stable collection of every call site ever executed,
/// guarded by a single lock. Registration, per-site recompute, and the bulk
/// sweep fully serialize against each other.
pub struct SiteRegistry {
    sites: Mutex<Vec<SiteRecord>>,
}

impl SiteRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sites: Mutex::new(Vec::new()),
        }
    }

    /// A poisoned registry lock must not take logging down with it.
    fn lock(&self) -> MutexGuard<'_, Vec<SiteRecord>> {
        self.sites.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Idempotent registration: concurrent first-hits of the same statement
    /// race to the lock and only the winner resolves a handle and appends;
    /// the loser sees the initialized flag and returns.
    pub fn initialize(
        &self,
        backend: &dyn Backend,
        site: &'static LogSite,
        name: &str,
        level: Level,
    ) {
        let mut sites = self.lock();
        if site.is_initialized() {
            return;
        }

        let handle = backend.get_handle(name);
        site.handle.store(handle.as_raw(), Ordering::Relaxed);
        site.level.store(level as u8, Ordering::Relaxed);
        site.slot.store(sites.len(), Ordering::Relaxed);
        sites.push(SiteRecord { site });

        recompute(backend, site);
        site.initialized.store(true, Ordering::Release);
    }

    /// Overwrites the site's configured level without recomputing the enabled
    /// bit — callers follow up with `check_enabled` or a bulk notification.
    pub fn set_level(&self, site: &LogSite, level: Level) {
        let _guard = self.lock();
        if site.slot.load(Ordering::Relaxed) != UNREGISTERED {
            site.level.store(level as u8, Ordering::Relaxed);
        }
    }

    /// Recomputes one site's enabled bit against the backend's current state.
    pub fn check_enabled(&self, backend: &dyn Backend, site: &LogSite) {
        let _guard = self.lock();
        recompute(backend, site);
    }

    /// Bulk recompute in registration order — the only path that sweeps the
    /// whole registry. Holds the lock for the entire sweep, so staleness after
    /// a configuration change is bounded by this call, not by time.
    pub fn notify_levels_changed(&self, backend: &dyn Backend) {
        let sites = self.lock();
        for record in sites.iter() {
            recompute(backend, record.site);
        }
    }

    /// Number of registered sites — idempotency checks in tests rely on this.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller holds the registry lock.
fn recompute(backend: &dyn Backend, site: &LogSite) {
    let enabled = backend.is_enabled_for(site.handle(), site.level());
    site.enabled.store(enabled, Ordering::Relaxed);
}
