use std::time::Duration;

use chrono::{DateTime, Utc};

/// Stable identity of a notification, independent of its list position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    /// How long a notification of this level stays visible
    pub fn dismiss_after(self) -> Duration {
        match self {
            Level::Info => Duration::from_secs(3),
            Level::Warning => Duration::from_secs(4),
            Level::Error => Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub dismiss_after: Duration,
    pub dismissed: bool,
}

/// Append-only notification log
///
/// Entries are never removed; dismissal only flips a flag so that ids handed
/// out to expiry timers stay valid.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    entries: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn push(&mut self, level: Level, message: impl Into<String>) -> &Notification {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            message: message.into(),
            level,
            created_at: Utc::now(),
            dismiss_after: level.dismiss_after(),
            dismissed: false,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Mark the notification dismissed. Returns false for unknown ids.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.dismissed = true;
                true
            }
            None => false,
        }
    }

    /// Notifications still on screen, oldest first
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(|n| !n.dismissed)
    }

    pub fn all(&self) -> &[Notification] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }
}
