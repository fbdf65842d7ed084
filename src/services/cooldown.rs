use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Per-requester wake cooldowns stored on the person being woken.
///
/// Keys are requester identifiers, values are the earliest instant a new
/// nudge from that requester is allowed. Expired entries are kept until the
/// next successful nudge overwrites them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cooldowns {
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expiry_for(&self, requester: &str) -> Option<DateTime<Utc>> {
        self.entries.get(requester).copied()
    }

    /// Time left before `requester` may nudge again, if any.
    pub fn remaining(&self, requester: &str, now: DateTime<Utc>) -> Option<Duration> {
        self.expiry_for(requester)
            .filter(|expiry| *expiry > now)
            .map(|expiry| expiry - now)
    }

    pub fn is_active(&self, requester: &str, now: DateTime<Utc>) -> bool {
        self.remaining(requester, now).is_some()
    }

    /// Overwrites any previous expiry for `requester`.
    pub fn set(&mut self, requester: impl Into<String>, expiry: DateTime<Utc>) {
        self.entries.insert(requester.into(), expiry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DateTime<Utc>)> {
        self.entries.iter().map(|(requester, expiry)| (requester.as_str(), expiry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, DateTime<Utc>)> for Cooldowns {
    fn from_iter<I: IntoIterator<Item = (String, DateTime<Utc>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Formats a remaining cooldown for humans, rounding up to the next minute.
pub fn format_remaining(remaining: Duration) -> String {
    let total_minutes = (remaining.num_seconds() + 59) / 60;
    let total_minutes = total_minutes.max(1);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
