//! Responsive breakpoints and dashboard geometry.
//!
//! Single source of truth for width thresholds - no magic numbers scattered in render code.
//! The hit map records where interactive elements landed in the last frame so
//! mouse events can be routed back to them.

use crate::backend::StatField;
use crate::dashboard::view::ElementId;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 60 cols: Split pane, minimal terminal
    Compact,
    /// 60-99 cols: Half-screen
    Normal,
    /// 100-139 cols: Full terminal
    Wide,
    /// 140+ cols: Ultrawide monitor
    UltraWide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            100..=139 => Breakpoint::Wide,
            _ => Breakpoint::UltraWide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
            Breakpoint::UltraWide => 3,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard areas
// ─────────────────────────────────────────────────────────────────────────────

/// Where each dashboard piece goes in the content area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardAreas {
    pub stream: Rect,
    /// In `StatField::ALL` order
    pub cards: [Rect; 3],
    pub toggle: Rect,
    pub refresh: Rect,
}

const CARD_HEIGHT: u16 = 4;
const BUTTON_HEIGHT: u16 = 3;

impl DashboardAreas {
    /// Wide terminals put the stream left and cards plus controls right;
    /// narrower ones stack everything.
    pub fn compute(area: Rect) -> Self {
        let bp = Breakpoint::from_width(area.width);

        if bp.at_least(Breakpoint::Wide) {
            let [stream, side] = split::<2>(
                area,
                Direction::Horizontal,
                [Constraint::Percentage(60), Constraint::Percentage(40)],
            );
            let [c0, c1, c2, controls, _] = split::<5>(
                side,
                Direction::Vertical,
                [
                    Constraint::Length(CARD_HEIGHT),
                    Constraint::Length(CARD_HEIGHT),
                    Constraint::Length(CARD_HEIGHT),
                    Constraint::Length(BUTTON_HEIGHT),
                    Constraint::Min(0),
                ],
            );
            let [toggle, refresh] = halves(controls);
            Self {
                stream,
                cards: [c0, c1, c2],
                toggle,
                refresh,
            }
        } else {
            let [stream, cards, controls] = split::<3>(
                area,
                Direction::Vertical,
                [
                    Constraint::Min(3),
                    Constraint::Length(CARD_HEIGHT),
                    Constraint::Length(BUTTON_HEIGHT),
                ],
            );
            let [c0, c1, c2] = split::<3>(
                cards,
                Direction::Horizontal,
                [
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ],
            );
            let [toggle, refresh] = halves(controls);
            Self {
                stream,
                cards: [c0, c1, c2],
                toggle,
                refresh,
            }
        }
    }

    pub fn card(&self, field: StatField) -> Rect {
        match field {
            StatField::Red => self.cards[0],
            StatField::Yellow => self.cards[1],
            StatField::TotalFrames => self.cards[2],
        }
    }
}

fn split<const N: usize>(area: Rect, direction: Direction, constraints: [Constraint; N]) -> [Rect; N] {
    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);
    std::array::from_fn(|i| chunks[i])
}

fn halves(area: Rect) -> [Rect; 2] {
    split::<2>(
        area,
        Direction::Horizontal,
        [Constraint::Percentage(50), Constraint::Percentage(50)],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Hit testing
// ─────────────────────────────────────────────────────────────────────────────

/// Element rectangles from the last drawn frame
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(ElementId, Rect)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, id: ElementId, rect: Rect) {
        self.regions.push((id, rect));
    }

    pub fn rect_of(&self, id: ElementId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(region, _)| *region == id)
            .map(|(_, rect)| *rect)
    }

    /// Topmost element under a cell; later registrations win
    pub fn element_at(&self, column: u16, row: u16) -> Option<(ElementId, Rect)> {
        let pos = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .copied()
    }

    /// Stat card under a cell, for hover elevation
    pub fn card_at(&self, column: u16, row: u16) -> Option<StatField> {
        let (id, _) = self.element_at(column, row)?;
        StatField::ALL
            .into_iter()
            .find(|field| ElementId::for_stat(*field) == id)
    }
}
