use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionRect;
use crate::sequence::InputToken;

pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    /// Converts to the floating-point rectangle used by marquee hit-testing.
    pub fn to_selection_rect(self) -> SelectionRect {
        SelectionRect {
            left: f64::from(self.x),
            top: f64::from(self.y),
            width: f64::from(self.w),
            height: f64::from(self.h),
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 48,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags {
    pub minimizable: bool,
    pub zoomable: bool,
    pub shadeable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            minimizable: true,
            zoomable: true,
            shadeable: true,
        }
    }
}

/// Visible presentation of a window, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowPresentation {
    /// Chrome and content are rendered.
    Normal,
    /// Nothing is rendered except the taskbar entry.
    Minimized,
    /// Only the title bar is rendered.
    Shaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub rect: WindowRect,
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub shaded: bool,
    pub zoomed: bool,
    pub flags: WindowFlags,
    /// Document shown in the content area, when the window hosts an editor.
    pub document_id: Option<String>,
}

impl WindowRecord {
    pub fn presentation(&self) -> WindowPresentation {
        if self.minimized {
            WindowPresentation::Minimized
        } else if self.shaded {
            WindowPresentation::Shaded
        } else {
            WindowPresentation::Normal
        }
    }

    /// Whether the content area (below the title bar) is rendered.
    pub fn content_visible(&self) -> bool {
        self.presentation() == WindowPresentation::Normal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub id: String,
    pub label: String,
    pub rect: WindowRect,
}

/// Session tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPreferences {
    /// How long the hidden-gesture pulse stays visible after a match.
    pub gesture_pulse_ms: u64,
    /// Width and height below which a marquee drag still counts as a click.
    pub selection_threshold_px: f64,
    /// Nested notification depth after which store writes stop re-broadcasting.
    pub max_notify_depth: usize,
    /// Input sequence that fires the hidden gesture.
    pub hidden_sequence: Vec<InputToken>,
}

impl Default for SessionPreferences {
    fn default() -> Self {
        Self {
            gesture_pulse_ms: 3_000,
            selection_threshold_px: crate::selection::DEFAULT_SELECTION_THRESHOLD_PX,
            max_notify_depth: 8,
            hidden_sequence: crate::sequence::konami_sequence(),
        }
    }
}

impl SessionPreferences {
    /// Parses host-supplied JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not valid JSON for this shape.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub windows: Vec<WindowRecord>,
    pub icons: Vec<DesktopIcon>,
    pub selected_icons: BTreeSet<String>,
    pub preferences: SessionPreferences,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
            icons: Vec::new(),
            selected_icons: BTreeSet::new(),
            preferences: SessionPreferences::default(),
        }
    }
}

impl DesktopState {
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// Window ids ordered back to front.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut windows: Vec<&WindowRecord> = self.windows.iter().collect();
        windows.sort_by_key(|w| w.z_index);
        windows.into_iter().map(|w| w.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub title: String,
    pub rect: Option<WindowRect>,
    pub flags: WindowFlags,
    pub document_id: Option<String>,
}

impl OpenWindowRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rect: None,
            flags: WindowFlags::default(),
            document_id: None,
        }
    }

    pub fn with_document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

/// Active marquee gesture on the desktop background.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSession {
    pub origin: PointerPosition,
    /// `None` until the drag leaves the click threshold.
    pub rect: Option<SelectionRect>,
    /// Selection to put back if the gesture is cancelled.
    pub selection_before: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub selecting: Option<SelectionSession>,
}
