use colored::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long a non-persistent notification stays active.
pub const AUTO_DISMISS: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub persistent: bool,
}

/// Transient message queue fed by every component that can fail or complete.
///
/// Entries are kept in insertion order, rendered to stderr when posted, and
/// auto-removed after [`AUTO_DISMISS`] unless persistent. Cheap to clone;
/// clones share the same active set.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    active: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notification and return its id. Non-persistent entries are
    /// scheduled for removal when a tokio runtime is available.
    pub fn post(
        &self,
        severity: Severity,
        title: impl Into<String>,
        body: impl Into<String>,
        persistent: bool,
    ) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            id,
            severity,
            title: title.into(),
            body: body.into(),
            persistent,
        };
        render(&notification);
        self.lock().push(notification);

        if !persistent {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let center = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(AUTO_DISMISS).await;
                    center.dismiss(id);
                });
            }
        }
        id
    }

    /// Remove a notification immediately. Dismissing an id that is already
    /// gone is a no-op; returns whether anything was removed.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut active = self.lock();
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }

    /// Snapshot of the active set, in insertion order.
    pub fn active(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn render(n: &Notification) {
    let prefix = match n.severity {
        Severity::Success => "ok:".green().bold(),
        Severity::Error => "error:".red().bold(),
        Severity::Warning => "warn:".yellow().bold(),
        Severity::Info => "info:".cyan().bold(),
    };
    eprintln!("{} {}: {}", prefix, n.title, n.body);
}
