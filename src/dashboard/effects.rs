// Decorative effects - hover elevation on stat cards, ripple on buttons
//
// Purely cosmetic: nothing here touches detection state or counters.

use super::view::ElementId;
use crate::backend::StatField;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

pub const RIPPLE_DURATION: Duration = Duration::from_millis(600);

/// Number of sampled keyframes across one ripple
const RIPPLE_STEPS: usize = 12;

/// One sampled ripple frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleFrame {
    /// Radius as a fraction of the ripple size (0.0..=1.0)
    pub scale: f32,
    /// 1.0 fully drawn, 0.0 invisible
    pub opacity: f32,
}

/// Ripple keyframes (scale 0→1, opacity 1→0, ease-out), built on first use
pub fn ripple_keyframes() -> &'static [RippleFrame] {
    static KEYFRAMES: OnceLock<Vec<RippleFrame>> = OnceLock::new();
    KEYFRAMES.get_or_init(|| {
        (0..=RIPPLE_STEPS)
            .map(|step| {
                let t = step as f32 / RIPPLE_STEPS as f32;
                let eased = 1.0 - (1.0 - t).powi(3);
                RippleFrame {
                    scale: eased,
                    opacity: 1.0 - eased,
                }
            })
            .collect()
    })
}

/// A ripple spawned by a click on a control button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub target: ElementId,
    /// Click position relative to the button's top-left cell
    pub origin: (u16, u16),
    /// max(width, height) of the button
    pub size: u16,
    started: Instant,
}

impl Ripple {
    /// Frame to draw at `now`, or None once finished
    pub fn frame(&self, now: Instant) -> Option<RippleFrame> {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= RIPPLE_DURATION {
            return None;
        }
        let frames = ripple_keyframes();
        let progress = elapsed.as_secs_f32() / RIPPLE_DURATION.as_secs_f32();
        let idx = ((progress * RIPPLE_STEPS as f32) as usize).min(frames.len() - 1);
        Some(frames[idx])
    }
}

/// Hover and ripple state for the page-load bindings
#[derive(Debug, Default)]
pub struct Decorations {
    hovered: Option<StatField>,
    ripples: Vec<Ripple>,
}

impl Decorations {
    pub fn hovered(&self) -> Option<StatField> {
        self.hovered
    }

    /// Mouse entered/left a stat card
    pub fn set_hovered(&mut self, card: Option<StatField>) {
        self.hovered = card;
    }

    pub fn is_elevated(&self, card: StatField) -> bool {
        self.hovered == Some(card)
    }

    /// Spawn a ripple on a control button; other targets are ignored
    pub fn ripple(&mut self, target: ElementId, origin: (u16, u16), size: u16, now: Instant) {
        if !target.is_control() || size == 0 {
            return;
        }
        self.ripples.push(Ripple {
            target,
            origin,
            size,
            started: now,
        });
    }

    /// Live ripples on `target`
    pub fn ripples_on(&self, target: ElementId) -> impl Iterator<Item = &Ripple> {
        self.ripples.iter().filter(move |r| r.target == target)
    }

    /// Remove finished ripples
    pub fn prune(&mut self, now: Instant) {
        self.ripples.retain(|r| r.frame(now).is_some());
    }

    #[cfg(test)]
    pub fn ripple_count(&self) -> usize {
        self.ripples.len()
    }
}
