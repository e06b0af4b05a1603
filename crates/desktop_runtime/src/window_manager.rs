//! Shared window-manager transition helpers used by the desktop reducer.
//!
//! `DesktopState::windows` is kept in stacking order, back to front. Every helper that reorders it
//! finishes with [`normalize_window_stack`], which renumbers `z_index` densely from 1.

use crate::model::{DesktopState, WindowId, WindowRecord, WindowRect};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

/// Focuses and raises `window_id`, restoring it first when minimized.
///
/// Returns `false` when the window does not exist.
pub fn focus_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| w.id == window_id) else {
        return false;
    };

    let already_focused_top = index + 1 == state.windows.len()
        && state
            .windows
            .get(index)
            .map(|w| w.is_focused && !w.minimized)
            .unwrap_or(false);
    if already_focused_top {
        return true;
    }

    for window in &mut state.windows {
        window.is_focused = false;
    }
    let mut window = state.windows.remove(index);
    window.is_focused = true;
    window.minimized = false;
    state.windows.push(window);
    normalize_window_stack(state);
    true
}

/// Gives focus to the frontmost window that is not minimized, or to nobody.
pub fn focus_topmost_visible(state: &mut DesktopState) -> Option<WindowId> {
    for window in &mut state.windows {
        window.is_focused = false;
    }
    let next = state.windows.iter_mut().rev().find(|w| !w.minimized)?;
    next.is_focused = true;
    Some(next.id)
}

/// Renumbers z-index ordering and repairs focus invariants for all managed windows.
///
/// Minimized windows lose focus and at most one window stays focused. No window gains focus here.
pub fn normalize_window_stack(state: &mut DesktopState) {
    let mut has_focused = false;
    for (idx, window) in state.windows.iter_mut().enumerate() {
        window.z_index = (idx + 1) as u32;
        if window.minimized {
            window.is_focused = false;
        }
        if window.is_focused {
            if has_focused {
                window.is_focused = false;
            } else {
                has_focused = true;
            }
        }
    }
}

/// Removes a window, moving focus to the next-highest remaining window when it held focus.
pub fn close_window_internal(state: &mut DesktopState, window_id: WindowId) -> Option<WindowRecord> {
    let index = state.windows.iter().position(|w| w.id == window_id)?;
    let removed = state.windows.remove(index);
    if removed.is_focused {
        focus_topmost_visible(state);
    }
    normalize_window_stack(state);
    Some(removed)
}

/// Minimizes a window. Shade and zoom flags are kept so restore returns to the same presentation.
pub fn minimize_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };
    if !window.flags.minimizable {
        return true;
    }
    let was_focused = window.is_focused;
    window.minimized = true;
    window.is_focused = false;
    if was_focused {
        focus_topmost_visible(state);
    }
    normalize_window_stack(state);
    true
}

/// Toggles between restored bounds and `viewport`. Focus and stacking are untouched.
pub fn toggle_zoom(window: &mut WindowRecord, viewport: WindowRect) {
    if !window.flags.zoomable {
        return;
    }
    if window.zoomed {
        if let Some(restore_rect) = window.restore_rect.take() {
            window.rect = restore_rect;
        }
        window.zoomed = false;
    } else {
        window.restore_rect = Some(window.rect);
        window.rect = viewport.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
        window.zoomed = true;
    }
}

/// Toggles the rolled-up presentation. Minimized windows have no title bar to act on.
pub fn toggle_shade(window: &mut WindowRecord) {
    if window.minimized || !window.flags.shadeable {
        return;
    }
    window.shaded = !window.shaded;
}

/// Cascading default placement derived from the window id.
pub fn cascade_rect(window_id: WindowId) -> WindowRect {
    let default_offset = ((window_id.0 as i32) - 1).rem_euclid(8) * 20;
    WindowRect {
        x: 40 + default_offset,
        y: 48 + default_offset,
        ..WindowRect::default()
    }
}
