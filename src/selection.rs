//! Selection and hover highlighting.
//!
//! Selection is a timed state machine driven by one [`TransitionState`]:
//!
//! ```text
//!   Unselected --select--> Selecting --(duration)--> Selected
//!        ^                                              |
//!        +--(duration)-- Deselecting <------release-----+
//! ```
//!
//! Selecting a new target at any point, including mid-reverse, replaces the
//! transition with a fresh forward one. Releasing keeps the old target
//! reported as selected until the reverse animation has fully played.
//!
//! Hover is tracked separately and never touches the selection state.

use glam::Vec2;

use crate::object::ObjectId;

/// Default animation length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// The single in-flight (or settled) selection transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub from: Option<ObjectId>,
    pub to: Option<ObjectId>,
    pub start_ms: f64,
    pub direction: Direction,
}

/// Observable phase at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPhase {
    Unselected,
    Selecting { target: ObjectId, progress: f32 },
    Selected(ObjectId),
    Deselecting { target: ObjectId, progress: f32 },
}

impl SelectionPhase {
    /// The object the phase is animating or showing, if any.
    pub fn target(&self) -> Option<ObjectId> {
        match *self {
            SelectionPhase::Unselected => None,
            SelectionPhase::Selecting { target, .. }
            | SelectionPhase::Deselecting { target, .. }
            | SelectionPhase::Selected(target) => Some(target),
        }
    }

    /// Border growth in `[0, 1]`; `1` when fully selected.
    pub fn progress(&self) -> f32 {
        match *self {
            SelectionPhase::Unselected => 0.0,
            SelectionPhase::Selected(_) => 1.0,
            SelectionPhase::Selecting { progress, .. }
            | SelectionPhase::Deselecting { progress, .. } => progress,
        }
    }

    /// The name label is only shown once the forward animation finishes.
    pub fn shows_label(&self) -> bool {
        matches!(self, SelectionPhase::Selected(_))
    }
}

#[derive(Debug, Clone)]
pub struct Selection {
    transition: Option<TransitionState>,
    duration_ms: f64,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

impl Selection {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            transition: None,
            duration_ms: duration_ms.max(f64::EPSILON),
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn transition(&self) -> Option<&TransitionState> {
        self.transition.as_ref()
    }

    /// Start a forward animation towards `target`, cancelling anything in flight.
    pub fn select(&mut self, target: ObjectId, now_ms: f64) {
        let from = self.selected_at(now_ms);
        self.transition = Some(TransitionState {
            from,
            to: Some(target),
            start_ms: now_ms,
            direction: Direction::Forward,
        });
    }

    /// Start a reverse animation away from the current target. A no-op
    /// when nothing is selected; restarts the timer if already reversing.
    pub fn release(&mut self, now_ms: f64) {
        let Some(current) = self.selected_at(now_ms) else {
            self.transition = None;
            return;
        };
        self.transition = Some(TransitionState {
            from: Some(current),
            to: None,
            start_ms: now_ms,
            direction: Direction::Reverse,
        });
    }

    /// Drop the selection immediately, without animation.
    pub fn clear(&mut self) {
        self.transition = None;
    }

    /// Clear if `id` is involved in the current transition.
    pub fn forget(&mut self, id: ObjectId) {
        if let Some(t) = &self.transition {
            if t.to == Some(id) || t.from == Some(id) {
                self.transition = None;
            }
        }
    }

    /// Collapse a finished reverse animation. Call once per frame.
    pub fn update(&mut self, now_ms: f64) {
        if let Some(t) = &self.transition {
            if t.direction == Direction::Reverse && self.elapsed_fraction(t, now_ms) >= 1.0 {
                self.transition = None;
            }
        }
    }

    /// Which object counts as selected at `now_ms`.
    pub fn selected_at(&self, now_ms: f64) -> Option<ObjectId> {
        self.phase(now_ms).target()
    }

    pub fn phase(&self, now_ms: f64) -> SelectionPhase {
        let Some(t) = &self.transition else {
            return SelectionPhase::Unselected;
        };
        let f = self.elapsed_fraction(t, now_ms);
        match (t.direction, t.to, t.from) {
            (Direction::Forward, Some(target), _) if f >= 1.0 => SelectionPhase::Selected(target),
            (Direction::Forward, Some(target), _) => SelectionPhase::Selecting {
                target,
                progress: f,
            },
            (Direction::Reverse, _, Some(target)) if f < 1.0 => SelectionPhase::Deselecting {
                target,
                progress: 1.0 - f,
            },
            _ => SelectionPhase::Unselected,
        }
    }

    pub fn progress(&self, now_ms: f64) -> f32 {
        self.phase(now_ms).progress()
    }

    fn elapsed_fraction(&self, t: &TransitionState, now_ms: f64) -> f32 {
        ((now_ms - t.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }
}

/// Hover target plus the time it started, for the border growth animation.
#[derive(Debug, Clone, Default)]
pub struct Hover {
    current: Option<(ObjectId, f64)>,
}

impl Hover {
    /// Record the object under the pointer this frame.
    pub fn update(&mut self, target: Option<ObjectId>, now_ms: f64) {
        self.current = match (self.current, target) {
            (Some((old, since)), Some(new)) if old == new => Some((old, since)),
            (_, Some(new)) => Some((new, now_ms)),
            (_, None) => None,
        };
    }

    pub fn target(&self) -> Option<ObjectId> {
        self.current.map(|(id, _)| id)
    }

    pub fn progress(&self, now_ms: f64, duration_ms: f64) -> f32 {
        match self.current {
            Some((_, since)) => ((now_ms - since) / duration_ms.max(f64::EPSILON)).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// An animated outline square plus where its label goes, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub centre: Vec2,
    /// Current (animated) side length.
    pub side: f32,
    /// Full side length once the animation completes.
    pub full_side: f32,
    /// Top-left corner of the name/class label block.
    pub label_at: Vec2,
}

/// Lay out an outline of `full_side` around `centre`, clamped so the full
/// box stays on screen, with a label block of `label_size` to its right.
pub fn layout_outline(
    centre: Vec2,
    full_side: f32,
    progress: f32,
    label_size: Vec2,
    screen: Vec2,
) -> Outline {
    let half = full_side / 2.0;
    let centre = Vec2::new(
        clamp_soft(centre.x, half + 2.0, screen.x - half - 2.0),
        clamp_soft(centre.y, half + 2.0, screen.y - half - 2.0),
    );
    let mut label = Vec2::new(centre.x + half + 16.0, centre.y - half);
    if label.x + label_size.x > screen.x {
        label.x = screen.x - label_size.x;
    }
    if label.y + label_size.y > screen.y {
        label.y = screen.y - label_size.y;
    }
    let label_at = label.max(Vec2::ZERO);
    Outline {
        centre,
        side: full_side * progress.clamp(0.0, 1.0),
        full_side,
        label_at,
    }
}

/// Clamp that tolerates `lo > hi` (box larger than the screen) by centring.
fn clamp_soft(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ObjectId = ObjectId(1);
    const B: ObjectId = ObjectId(2);

    #[test]
    fn test_forward_animation() {
        let mut sel = Selection::new(200.0);
        assert_eq!(sel.phase(0.0), SelectionPhase::Unselected);
        sel.select(A, 1000.0);
        assert_eq!(sel.selected_at(1000.0), Some(A));
        assert_eq!(
            sel.phase(1100.0),
            SelectionPhase::Selecting { target: A, progress: 0.5 }
        );
        assert!(!sel.phase(1100.0).shows_label());
        assert_eq!(sel.phase(1200.0), SelectionPhase::Selected(A));
        assert!(sel.phase(1200.0).shows_label());
    }

    #[test]
    fn test_release_keeps_target_until_done() {
        let mut sel = Selection::new(200.0);
        sel.select(A, 0.0);
        sel.release(500.0);
        assert_eq!(sel.selected_at(550.0), Some(A));
        assert_eq!(sel.progress(550.0), 0.75);
        sel.update(650.0);
        assert_eq!(sel.selected_at(650.0), Some(A));
        assert_eq!(sel.selected_at(700.0), None);
        sel.update(700.0);
        assert!(sel.transition().is_none());
    }

    #[test]
    fn test_reselect_during_reverse() {
        let mut sel = Selection::new(200.0);
        sel.select(A, 0.0);
        sel.release(300.0);
        sel.select(B, 350.0);
        let t = sel.transition().unwrap();
        assert_eq!(t.direction, Direction::Forward);
        assert_eq!(t.from, Some(A));
        assert_eq!(t.to, Some(B));
        assert_eq!(sel.selected_at(360.0), Some(B));
        // The old reverse must not clear the new target
        sel.update(600.0);
        assert_eq!(sel.phase(600.0), SelectionPhase::Selected(B));
    }

    #[test]
    fn test_release_without_selection_is_noop() {
        let mut sel = Selection::default();
        sel.release(10.0);
        assert!(sel.transition().is_none());
    }

    #[test]
    fn test_forget() {
        let mut sel = Selection::default();
        sel.select(A, 0.0);
        sel.forget(B);
        assert_eq!(sel.selected_at(0.0), Some(A));
        sel.forget(A);
        assert_eq!(sel.selected_at(0.0), None);
    }

    #[test]
    fn test_hover_restart_on_change() {
        let mut hover = Hover::default();
        hover.update(Some(A), 0.0);
        hover.update(Some(A), 100.0);
        assert_eq!(hover.progress(100.0, 200.0), 0.5);
        hover.update(Some(B), 150.0);
        assert_eq!(hover.progress(150.0, 200.0), 0.0);
        hover.update(None, 160.0);
        assert_eq!(hover.target(), None);
    }

    #[test]
    fn test_outline_clamped_to_screen() {
        let screen = Vec2::new(200.0, 150.0);
        let o = layout_outline(Vec2::new(5.0, 140.0), 40.0, 0.5, Vec2::new(60.0, 30.0), screen);
        assert_eq!(o.centre, Vec2::new(22.0, 128.0));
        assert_eq!(o.side, 20.0);
        assert_eq!(o.label_at, Vec2::new(58.0, 108.0));

        let right = layout_outline(Vec2::new(190.0, 75.0), 20.0, 1.0, Vec2::new(60.0, 30.0), screen);
        assert_eq!(right.label_at.x, 140.0);

        let huge = layout_outline(Vec2::new(0.0, 0.0), 1000.0, 1.0, Vec2::ZERO, screen);
        assert_eq!(huge.centre, Vec2::new(100.0, 75.0));
    }
}
