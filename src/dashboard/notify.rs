//! Notification presenter
//!
//! Toasts follow a fixed timeline measured from creation:
//!
//! ```text
//! 0ms ── pending ── 100ms ── entering ── 400ms ── shown ── 3000ms ── leaving ── 3300ms (removed)
//! ```
//!
//! Every toast is scheduled independently. There is no queue, no dedupe and
//! no stacking: all of them anchor top-right, newest drawn last.

use std::time::{Duration, Instant};

/// Delay before the slide-in starts (lets the first frame lay out)
pub const ENTER_DELAY: Duration = Duration::from_millis(100);
/// Slide transition length, both directions
pub const TRANSITION: Duration = Duration::from_millis(300);
/// Time from creation until the slide-out starts
pub const DISPLAY_DURATION: Duration = Duration::from_millis(3000);

/// Severity of a notification; picks its color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Where a toast is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created but still hidden off-screen
    Pending,
    /// Sliding in
    Entering,
    Shown,
    /// Sliding out
    Leaving,
    /// Past its lifetime; pruned on the next tick
    Expired,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    created_at: Instant,
}

impl Notification {
    pub fn phase(&self, now: Instant) -> Phase {
        let elapsed = now.saturating_duration_since(self.created_at);
        if elapsed < ENTER_DELAY {
            Phase::Pending
        } else if elapsed < ENTER_DELAY + TRANSITION {
            Phase::Entering
        } else if elapsed < DISPLAY_DURATION {
            Phase::Shown
        } else if elapsed < DISPLAY_DURATION + TRANSITION {
            Phase::Leaving
        } else {
            Phase::Expired
        }
    }

    /// How far off-screen the toast sits: 1.0 fully hidden, 0.0 in place
    pub fn offset(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.created_at);
        match self.phase(now) {
            Phase::Pending | Phase::Expired => 1.0,
            Phase::Shown => 0.0,
            Phase::Entering => {
                let t = (elapsed - ENTER_DELAY).as_secs_f32() / TRANSITION.as_secs_f32();
                1.0 - t.clamp(0.0, 1.0)
            }
            Phase::Leaving => {
                let t = (elapsed - DISPLAY_DURATION).as_secs_f32() / TRANSITION.as_secs_f32();
                t.clamp(0.0, 1.0)
            }
        }
    }
}

/// Owns the live toasts
#[derive(Debug, Default)]
pub struct NotificationPresenter {
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a toast. It is logged as well, which is all headless mode shows.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) -> u64 {
        let message = message.into();
        match kind {
            NotificationKind::Error => tracing::warn!(kind = kind.as_str(), "{}", message),
            _ => tracing::info!(kind = kind.as_str(), "{}", message),
        }

        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            message,
            kind,
            created_at: now,
        });
        id
    }

    /// Drop toasts whose lifetime ended
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| {
            let live = n.phase(now) != Phase::Expired;
            if !live {
                tracing::trace!(id = n.id, "Notification removed");
            }
            live
        });
    }

    /// Toasts fully or partly on screen (entering or shown)
    #[cfg(test)]
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.items
            .iter()
            .filter(move |n| matches!(n.phase(now), Phase::Entering | Phase::Shown))
    }

    /// Toasts the renderer should draw, with their slide offset, oldest first
    pub fn drawable(&self, now: Instant) -> Vec<(&Notification, f32)> {
        self.items
            .iter()
            .filter(|n| matches!(n.phase(now), Phase::Entering | Phase::Shown | Phase::Leaving))
            .map(|n| (n, n.offset(now)))
            .collect()
    }

    /// Whether a toast is still in the presenter (not yet removed)
    #[cfg(test)]
    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All toasts in creation order
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn lifecycle_windows() {
        let t = Instant::now();
        let mut presenter = NotificationPresenter::new();
        let id = presenter.notify("Statistics refreshed", NotificationKind::Success, t);

        assert_eq!(presenter.visible(t + ms(50)).count(), 0, "hidden during layout delay");
        for offset in [101, 500, 1500, 2999] {
            assert_eq!(
                presenter.visible(t + ms(offset)).count(),
                1,
                "visible at T+{offset}ms"
            );
        }
        assert_eq!(presenter.visible(t + ms(3100)).count(), 0, "sliding out");

        presenter.prune(t + ms(3200));
        assert!(presenter.contains(id), "still in the document while leaving");

        presenter.prune(t + ms(3300));
        assert!(!presenter.contains(id), "removed by T+3300ms");
    }

    #[test]
    fn slide_offsets() {
        let t = Instant::now();
        let mut presenter = NotificationPresenter::new();
        presenter.notify("hello", NotificationKind::Info, t);
        let toast = presenter.iter().next().unwrap();

        assert_eq!(toast.offset(t), 1.0);
        let halfway_in = toast.offset(t + ms(250));
        assert!(halfway_in > 0.4 && halfway_in < 0.6, "got {halfway_in}");
        assert_eq!(toast.offset(t + ms(1000)), 0.0);
        let halfway_out = toast.offset(t + ms(3150));
        assert!(halfway_out > 0.4 && halfway_out < 0.6, "got {halfway_out}");
    }

    #[test]
    fn concurrent_toasts_are_independent() {
        let t = Instant::now();
        let mut presenter = NotificationPresenter::new();
        presenter.notify("first", NotificationKind::Info, t);
        presenter.notify("first", NotificationKind::Info, t + ms(1000));
        presenter.notify("third", NotificationKind::Error, t + ms(2000));

        assert_eq!(presenter.len(), 3, "no dedupe");
        assert_eq!(presenter.visible(t + ms(2500)).count(), 3);

        presenter.prune(t + ms(3400));
        assert_eq!(presenter.len(), 2);

        let drawable = presenter.drawable(t + ms(2500));
        assert_eq!(drawable.last().map(|(n, _)| n.message.as_str()), Some("third"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(NotificationKind::default(), NotificationKind::Info);
        assert_eq!(NotificationKind::Error.as_str(), "error");
    }
}
