//! Viewport state machine for the wall surface
//!
//! The visible region of the wall is a rectangle in wall coordinates (the
//! SVG `viewBox`). It starts equal to the surface's declared extent, which
//! also bounds every later state:
//!
//! - width/height never exceed the original extent and never drop below
//!   1/10000 of it
//! - the rectangle always lies fully inside the original extent
//! - the aspect ratio is always the original's
//!
//! Wheel input zooms around the cursor; a primary-button drag pans. The math
//! lives in the pure functions [`zoom_view_box`] and [`pan_view_box`];
//! [`ViewportController`] owns the current rectangle plus the Idle/Panning
//! interaction state and feeds input events through them.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::model::format_number;

/// Wheel sensitivity: `scale = exp(delta_y * ZOOM_SPEED)`
pub const ZOOM_SPEED: f64 = 0.001;

/// Deepest zoom as a divisor of the original width
pub const MAX_ZOOM_RATIO: f64 = 10_000.0;

/// Extent used when the surface declares none (or an unusable one)
pub const DEFAULT_VIEW_BOX: ViewBox = ViewBox {
    x: 0.0,
    y: 0.0,
    w: 1920.0,
    h: 1080.0,
};

/// Rectangle in wall coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ViewBox {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Parse `"x y w h"` (whitespace and/or comma separated)
    ///
    /// Returns `None` unless there are exactly four finite numbers with a
    /// positive width and height.
    pub fn parse(attribute: &str) -> Option<Self> {
        let values: Vec<f64> = attribute
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()?;

        match values.as_slice() {
            &[x, y, w, h] if w > 0.0 && h > 0.0 => Some(Self::new(x, y, w, h)),
            _ => None,
        }
    }

    /// Declared surface extent, falling back to [`DEFAULT_VIEW_BOX`]
    pub fn from_attribute(attribute: Option<&str>) -> Self {
        match attribute.and_then(Self::parse) {
            Some(view_box) => view_box,
            None => {
                debug!(?attribute, "Unusable viewBox attribute, using default extent");
                DEFAULT_VIEW_BOX
            }
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// True when `inner` lies fully inside `self`
    pub fn contains(&self, inner: &ViewBox) -> bool {
        inner.x >= self.x && inner.y >= self.y && inner.right() <= self.right() && inner.bottom() <= self.bottom()
    }

    /// Height/width ratio
    pub fn aspect(&self) -> f64 {
        self.h / self.w
    }

    /// Shift a `w` × `h` rectangle at (`x`, `y`) so it lies inside `self`
    ///
    /// The lower bound is applied last: at full width `max_x` can round to
    /// just below `self.x`.
    fn clamp_position(&self, x: f64, y: f64, w: f64, h: f64) -> ViewBox {
        let max_x = self.x + self.w - w;
        let max_y = self.y + self.h - h;
        ViewBox::new(x.min(max_x).max(self.x), y.min(max_y).max(self.y), w, h)
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        DEFAULT_VIEW_BOX
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            format_number(self.x),
            format_number(self.y),
            format_number(self.w),
            format_number(self.h)
        )
    }
}

/// Pixel position in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PxPos {
    pub x: f64,
    pub y: f64,
}

impl PxPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of the rendering surface in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A surface with no area cannot map pixels to wall space
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Edges count as inside
    pub fn contains(&self, pos: PxPos) -> bool {
        !self.is_degenerate()
            && pos.x >= self.left
            && pos.x <= self.left + self.width
            && pos.y >= self.top
            && pos.y <= self.top + self.height
    }
}

/// Zoom `current` by `exp(delta_y * ZOOM_SPEED)` keeping the wall point under
/// `cursor` fixed on screen
///
/// Width is clamped to `[original.w / 10000, original.w]`, height follows the
/// original aspect ratio, and the result is shifted back inside `original`.
/// A degenerate surface leaves `current` unchanged.
pub fn zoom_view_box(
    current: ViewBox,
    original: ViewBox,
    surface: &Surface,
    cursor: PxPos,
    delta_y: f64,
) -> ViewBox {
    if surface.is_degenerate() || !delta_y.is_finite() {
        return current;
    }

    let scale = (delta_y * ZOOM_SPEED).exp();
    let min_w = original.w / MAX_ZOOM_RATIO;
    let new_w = (current.w * scale).max(min_w).min(original.w);
    // Full width snaps to the original height exactly
    let new_h = if new_w >= original.w {
        original.h
    } else {
        new_w * original.aspect()
    };

    // Cursor as a fraction of the surface, then as a wall point before the zoom
    let fx = (cursor.x - surface.left) / surface.width;
    let fy = (cursor.y - surface.top) / surface.height;
    let anchor_x = current.x + fx * current.w;
    let anchor_y = current.y + fy * current.h;

    original.clamp_position(anchor_x - fx * new_w, anchor_y - fy * new_h, new_w, new_h)
}

/// Pan relative to a drag that started at `start` with viewport `snapshot`
///
/// The pixel delta is converted with the snapshot's scale; the size of
/// `current` is kept and the position clamped inside `original`.
pub fn pan_view_box(
    current: ViewBox,
    snapshot: ViewBox,
    original: ViewBox,
    surface: &Surface,
    start: PxPos,
    now: PxPos,
) -> ViewBox {
    if surface.is_degenerate() {
        return current;
    }

    let dx = (now.x - start.x) / surface.width * snapshot.w;
    let dy = (now.y - start.y) / surface.height * snapshot.h;

    original.clamp_position(snapshot.x - dx, snapshot.y - dy, current.w, current.h)
}

/// Kind of device behind a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

/// Active drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSession {
    pub pointer_id: i64,
    pub start: PxPos,
    pub snapshot: ViewBox,
}

/// Interaction state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning(PanSession),
}

impl InteractionState {
    pub fn is_panning(&self) -> bool {
        matches!(self, InteractionState::Panning(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning(_) => "panning",
        }
    }
}

/// Input event stream driving a [`ViewportController`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Wheel {
        surface: Surface,
        position: PxPos,
        delta_y: f64,
    },
    PointerDown {
        pointer_id: i64,
        pointer_kind: PointerKind,
        #[serde(default)]
        button: i16,
        position: PxPos,
    },
    PointerMove {
        surface: Surface,
        pointer_id: i64,
        position: PxPos,
    },
    PointerUp {
        pointer_id: i64,
    },
    PointerCancel {
        pointer_id: i64,
    },
    PointerLeave {
        pointer_id: i64,
    },
}

/// Viewport as reported to the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportStatus {
    pub view_box: ViewBox,
    /// Value for the surface's `viewBox` attribute
    pub view_box_attr: String,
    pub state: &'static str,
}

/// Owns one surface's viewport and interaction state
#[derive(Debug, Clone)]
pub struct ViewportController {
    original: ViewBox,
    current: ViewBox,
    state: InteractionState,
}

impl ViewportController {
    /// Start Idle with the viewport equal to `original`
    pub fn new(original: ViewBox) -> Self {
        Self {
            original,
            current: original,
            state: InteractionState::Idle,
        }
    }

    /// Start from the surface's declared `viewBox` attribute
    pub fn from_attribute(attribute: Option<&str>) -> Self {
        Self::new(ViewBox::from_attribute(attribute))
    }

    pub fn original(&self) -> ViewBox {
        self.original
    }

    pub fn view_box(&self) -> ViewBox {
        self.current
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn status(&self) -> ViewportStatus {
        ViewportStatus {
            view_box: self.current,
            view_box_attr: self.current.to_string(),
            state: self.state.name(),
        }
    }

    /// Back to the original extent, Idle
    pub fn reset(&mut self) {
        self.current = self.original;
        self.state = InteractionState::Idle;
    }

    /// Cursor-anchored zoom; interaction state is left as it is
    pub fn zoom_at(&mut self, surface: &Surface, cursor: PxPos, delta_y: f64) -> ViewBox {
        self.current = zoom_view_box(self.current, self.original, surface, cursor, delta_y);
        self.current
    }

    /// Start a drag; returns false when a non-primary mouse button pressed
    ///
    /// A new pointer-down replaces any drag already in progress.
    pub fn begin_pan(&mut self, pointer_id: i64, kind: PointerKind, button: i16, position: PxPos) -> bool {
        if kind == PointerKind::Mouse && button != 0 {
            debug!(pointer_id, button, "Ignoring non-primary mouse button");
            return false;
        }

        self.state = InteractionState::Panning(PanSession {
            pointer_id,
            start: position,
            snapshot: self.current,
        });
        true
    }

    /// Follow the dragging pointer; leaving the surface cancels the drag
    pub fn update_pan(&mut self, surface: &Surface, pointer_id: i64, position: PxPos) -> ViewBox {
        let InteractionState::Panning(session) = self.state else {
            return self.current;
        };
        if session.pointer_id != pointer_id {
            debug!(pointer_id, active = session.pointer_id, "Ignoring move from inactive pointer");
            return self.current;
        }

        if !surface.contains(position) {
            debug!(pointer_id, "Pointer left surface, cancelling pan");
            self.state = InteractionState::Idle;
            return self.current;
        }

        self.current = pan_view_box(
            self.current,
            session.snapshot,
            self.original,
            surface,
            session.start,
            position,
        );
        self.current
    }

    /// Pointer released
    pub fn end_pan(&mut self, pointer_id: i64) -> bool {
        self.stop_pan(pointer_id)
    }

    /// Pointer cancelled by the platform
    pub fn cancel_pan(&mut self, pointer_id: i64) -> bool {
        self.stop_pan(pointer_id)
    }

    /// Pointer left the surface element
    pub fn leave(&mut self, pointer_id: i64) -> bool {
        self.stop_pan(pointer_id)
    }

    fn stop_pan(&mut self, pointer_id: i64) -> bool {
        match self.state {
            InteractionState::Panning(session) if session.pointer_id == pointer_id => {
                self.state = InteractionState::Idle;
                true
            }
            _ => {
                debug!(pointer_id, "Ignoring pan end for unrecognized pointer");
                false
            }
        }
    }

    /// Run one input event through the transition table
    pub fn apply(&mut self, event: InputEvent) -> ViewportStatus {
        match event {
            InputEvent::Wheel {
                surface,
                position,
                delta_y,
            } => {
                self.zoom_at(&surface, position, delta_y);
            }
            InputEvent::PointerDown {
                pointer_id,
                pointer_kind,
                button,
                position,
            } => {
                self.begin_pan(pointer_id, pointer_kind, button, position);
            }
            InputEvent::PointerMove {
                surface,
                pointer_id,
                position,
            } => {
                self.update_pan(&surface, pointer_id, position);
            }
            InputEvent::PointerUp { pointer_id } => {
                self.end_pan(pointer_id);
            }
            InputEvent::PointerCancel { pointer_id } => {
                self.cancel_pan(pointer_id);
            }
            InputEvent::PointerLeave { pointer_id } => {
                self.leave(pointer_id);
            }
        }
        self.status()
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_BOX)
    }
}
