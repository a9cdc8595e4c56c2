//! Pointer input routing
//!
//! Window coordinates here have their origin at the bottom-left corner with
//! y pointing up. Raw pointer positions come in with y pointing down and are
//! flipped before hit-testing.

use crate::frame::ImagePicker;
use crate::session::{ActiveSource, Session};
use tracing::debug;

/// Height of the button bar along the bottom edge
pub const BUTTON_BAR_HEIGHT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, edges included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.x0..=self.x1).contains(&p.x) && (self.y0..=self.y1).contains(&p.y)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Import,
    Reset,
    ToggleSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiButton {
    pub id: ButtonId,
    pub rect: Rect,
    pub enabled: bool,
    pub label: &'static str,
}

/// Buttons for the current session. The toggle stays in the list when there
/// is no camera but is disabled, which hides it and makes it inert.
pub fn layout(session: &Session) -> [UiButton; 3] {
    let toggle_label = match session.active_source() {
        ActiveSource::Camera => "Switch to Gallery",
        ActiveSource::Gallery | ActiveSource::Idle => "Switch to Camera",
    };

    [
        UiButton {
            id: ButtonId::Import,
            rect: Rect::new(20.0, 10.0, 220.0, 40.0),
            enabled: true,
            label: "Import from Gallery",
        },
        UiButton {
            id: ButtonId::Reset,
            rect: Rect::new(240.0, 10.0, 360.0, 40.0),
            enabled: true,
            label: "Reset",
        },
        UiButton {
            id: ButtonId::ToggleSource,
            rect: Rect::new(380.0, 10.0, 580.0, 40.0),
            enabled: session.camera_available(),
            label: toggle_label,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Release,
}

/// A pointer button event in raw window coordinates (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub action: ButtonAction,
}

/// Flips a raw pointer position into bottom-left-origin window coordinates.
pub fn to_window(raw: Point, surface_height: f32) -> Point {
    Point::new(raw.x, surface_height - raw.y)
}

/// The enabled button under a primary press, if any.
pub fn route(buttons: &[UiButton], event: &PointerEvent, surface_height: f32) -> Option<ButtonId> {
    if event.button != MouseButton::Primary || event.action != ButtonAction::Press {
        return None;
    }

    let point = to_window(event.position, surface_height);
    buttons
        .iter()
        .find(|button| button.enabled && button.rect.contains(point))
        .map(|button| button.id)
}

/// Routes one pointer event and applies the resulting transition.
pub fn handle_click(
    session: &mut Session,
    event: &PointerEvent,
    surface_height: f32,
    picker: &mut dyn ImagePicker,
) -> Option<ButtonId> {
    let hit = route(&layout(session), event, surface_height)?;
    debug!(button = ?hit, "Button clicked");
    session.apply(hit, picker);
    Some(hit)
}
