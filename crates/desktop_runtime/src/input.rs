//! Conversions from host input events into the tokens and coordinates the session consumes.

use crate::model::PointerPosition;
use crate::sequence::InputToken;

/// Keys that repeat while held or only modify other keys never feed the sequence matcher.
pub fn token_for_key(key: &str, repeat: bool) -> Option<InputToken> {
    if repeat {
        return None;
    }
    match key {
        "" | "Shift" | "Control" | "Alt" | "Meta" | "CapsLock" | "Dead" | "Unidentified" => None,
        _ => Some(InputToken::from_key(key)),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn token_from_keyboard_event(ev: &web_sys::KeyboardEvent) -> Option<InputToken> {
    token_for_key(&ev.key(), ev.repeat())
}

#[cfg(target_arch = "wasm32")]
pub fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

#[cfg(target_arch = "wasm32")]
pub fn pointer_from_mouse_event(ev: &web_sys::MouseEvent) -> PointerPosition {
    PointerPosition::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

/// Pointer position relative to an element's top-left corner.
pub fn relative_to(pointer: PointerPosition, origin_x: f64, origin_y: f64) -> PointerPosition {
    PointerPosition::new(pointer.x - origin_x, pointer.y - origin_y)
}
