//! Reducer actions, side-effect intents, and transition logic for the desktop session.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{
    DesktopIcon, DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition,
    SelectionSession, WindowId, WindowRecord, WindowRect,
};
use crate::selection;
use crate::window_manager::{
    cascade_rect, close_window_internal, focus_window_internal, minimize_window_internal,
    normalize_window_stack, toggle_shade, toggle_zoom, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window; it becomes focused and frontmost.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Drop focus from every window (pointer down on the desktop background).
    ClearFocus,
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Roll the window up to its title bar, or back down.
    ToggleShade {
        /// Window whose title bar was double-clicked.
        window_id: WindowId,
    },
    /// Switch between restored bounds and the provided viewport.
    ToggleZoom {
        /// Window to zoom.
        window_id: WindowId,
        /// Viewport rectangle to zoom into.
        viewport: WindowRect,
    },
    /// Taskbar icon click: restore if minimized, minimize if focused, focus otherwise.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
    /// Replace the desktop icon layout used for marquee hit-testing.
    SetDesktopIcons {
        /// Icons in render order.
        icons: Vec<DesktopIcon>,
    },
    /// Pointer down on the desktop background.
    BeginSelection {
        /// Marquee anchor.
        pointer: PointerPosition,
    },
    /// Pointer moved while a marquee is active.
    UpdateSelection {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer up: commit the marquee, or clear the selection if it never left click size.
    EndSelection,
    /// Abort the marquee and restore the selection it started with.
    CancelSelection,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Move keyboard focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// Tear down the document view hosted by a closed window.
    ReleaseDocumentView {
        /// Window that was closed.
        window_id: WindowId,
        /// Document that window was bound to.
        document_id: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window {0:?} not found")]
    WindowNotFound(WindowId),
}

/// Applies a [`DesktopAction`] to the session state and collects resulting side effects.
///
/// This is the single transition function for window management and desktop selection; chrome
/// controls never mutate [`DesktopState`] directly.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = next_window_id(state);
            let rect = req
                .rect
                .unwrap_or_else(|| cascade_rect(window_id))
                .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
            state.windows.push(WindowRecord {
                id: window_id,
                title: req.title,
                rect,
                restore_rect: None,
                z_index: 0,
                is_focused: false,
                minimized: false,
                shaded: false,
                zoomed: false,
                flags: req.flags,
                document_id: req.document_id,
            });
            focus_window_internal(state, window_id);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let closed = close_window_internal(state, window_id)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            if interaction
                .dragging
                .as_ref()
                .is_some_and(|session| session.window_id == window_id)
            {
                interaction.dragging = None;
            }
            if let Some(document_id) = closed.document_id {
                effects.push(RuntimeEffect::ReleaseDocumentView {
                    window_id,
                    document_id,
                });
            }
            if closed.is_focused {
                if let Some(focused) = state.focused_window_id() {
                    effects.push(RuntimeEffect::FocusWindowInput(focused));
                }
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            focus_or_missing(state, window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ClearFocus => {
            for window in &mut state.windows {
                window.is_focused = false;
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            if !minimize_window_internal(state, window_id) {
                return Err(ReducerError::WindowNotFound(window_id));
            }
        }
        DesktopAction::ToggleShade { window_id } => {
            toggle_shade(find_window_mut(state, window_id)?);
        }
        DesktopAction::ToggleZoom {
            window_id,
            viewport,
        } => {
            toggle_zoom(find_window_mut(state, window_id)?, viewport);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let focused = state.focused_window_id() == Some(window_id);
            let minimized = state
                .window(window_id)
                .map(|w| w.minimized)
                .ok_or(ReducerError::WindowNotFound(window_id))?;
            if minimized || !focused {
                focus_or_missing(state, window_id)?;
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            } else {
                minimize_window_internal(state, window_id);
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            focus_or_missing(state, window_id)?;
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                if !dx.is_finite() || !dy.is_finite() {
                    return Ok(effects);
                }
                let (dx, dy) = (dx.round() as i32, dy.round() as i32);
                let window = find_window_mut(state, session.window_id)?;
                if !window.zoomed {
                    window.rect = session.rect_start.offset(dx, dy);
                }
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::SetDesktopIcons { icons } => {
            let known: BTreeSet<&str> = icons.iter().map(|icon| icon.id.as_str()).collect();
            state.selected_icons.retain(|id| known.contains(id.as_str()));
            state.icons = icons;
        }
        DesktopAction::BeginSelection { pointer } => {
            interaction.selecting = Some(SelectionSession {
                origin: pointer,
                rect: None,
                selection_before: state.selected_icons.clone(),
            });
        }
        DesktopAction::UpdateSelection { pointer } => {
            if let Some(session) = interaction.selecting.as_mut() {
                session.rect = selection::marquee(
                    session.origin,
                    pointer,
                    state.preferences.selection_threshold_px,
                );
                if let Some(rect) = session.rect {
                    state.selected_icons = selection::hit_test(&rect, &state.icons)
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                }
            }
        }
        DesktopAction::EndSelection => {
            if let Some(session) = interaction.selecting.take() {
                if session.rect.is_none() {
                    state.selected_icons.clear();
                }
            }
        }
        DesktopAction::CancelSelection => {
            if let Some(session) = interaction.selecting.take() {
                state.selected_icons = session.selection_before;
            }
        }
    }

    normalize_window_stack(state);
    Ok(effects)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn focus_or_missing(state: &mut DesktopState, window_id: WindowId) -> Result<(), ReducerError> {
    if focus_window_internal(state, window_id) {
        Ok(())
    } else {
        Err(ReducerError::WindowNotFound(window_id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(state: &mut DesktopState, interaction: &mut InteractionState, title: &str) -> WindowId {
        let _ = reduce_desktop(
            state,
            interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(title)),
        )
        .expect("open window");
        state.windows.last().expect("window").id
    }

    fn dispatch(
        state: &mut DesktopState,
        interaction: &mut InteractionState,
        action: DesktopAction,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(state, interaction, action).expect("reduce")
    }

    fn focused_count(state: &DesktopState) -> usize {
        state.windows.iter().filter(|w| w.is_focused).count()
    }

    fn record(state: &DesktopState, window_id: WindowId) -> &WindowRecord {
        state.window(window_id).expect("window exists")
    }

    const VIEWPORT: WindowRect = WindowRect {
        x: 0,
        y: 0,
        w: 1200,
        h: 760,
    };

    #[test]
    fn open_window_focuses_new_window_and_updates_stack() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let first = open(&mut state, &mut interaction, "About");
        let second = open(&mut state, &mut interaction, "Projects");

        assert_eq!(state.focused_window_id(), Some(second));
        assert_eq!(state.stacking_order(), vec![first, second]);
        assert_eq!(record(&state, second).z_index, 2);
        assert_eq!(focused_count(&state), 1);
    }

    #[test]
    fn focus_close_scenario_transfers_to_next_highest_rank() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let w1 = open(&mut state, &mut interaction, "W1");
        let w2 = open(&mut state, &mut interaction, "W2");
        let w3 = open(&mut state, &mut interaction, "W3");
        assert_eq!(state.focused_window_id(), Some(w3));
        assert_eq!(state.stacking_order(), vec![w1, w2, w3]);

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { window_id: w1 },
        );
        assert_eq!(state.focused_window_id(), Some(w1));
        assert_eq!(focused_count(&state), 1);
        assert_eq!(state.stacking_order(), vec![w2, w3, w1]);
        let ranks: Vec<u32> = state.windows.iter().map(|w| w.z_index).collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: w1 },
        );
        assert_eq!(state.focused_window_id(), Some(w3));
        assert!(effects.contains(&RuntimeEffect::FocusWindowInput(w3)));
        assert_eq!(record(&state, w3).z_index, 2);
    }

    #[test]
    fn closing_last_window_leaves_nothing_focused() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let only = open(&mut state, &mut interaction, "Only");

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: only },
        );
        assert!(state.windows.is_empty());
        assert_eq!(state.focused_window_id(), None);
    }

    #[test]
    fn closing_unfocused_window_keeps_current_focus() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let back = open(&mut state, &mut interaction, "Back");
        let front = open(&mut state, &mut interaction, "Front");

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: back },
        );
        assert_eq!(state.focused_window_id(), Some(front));
        assert!(effects.is_empty());
    }

    #[test]
    fn closing_document_window_releases_its_view() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new("About").with_document("about")),
        );
        let window_id = state.windows[0].id;

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id },
        );
        assert_eq!(
            effects,
            vec![RuntimeEffect::ReleaseDocumentView {
                window_id,
                document_id: "about".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_window_is_an_error() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let missing = WindowId(42);
        for action in [
            DesktopAction::CloseWindow { window_id: missing },
            DesktopAction::FocusWindow { window_id: missing },
            DesktopAction::MinimizeWindow { window_id: missing },
            DesktopAction::ToggleShade { window_id: missing },
            DesktopAction::ToggleTaskbarWindow { window_id: missing },
        ] {
            assert_eq!(
                reduce_desktop(&mut state, &mut interaction, action),
                Err(ReducerError::WindowNotFound(missing))
            );
        }
    }

    #[test]
    fn minimize_moves_focus_and_taskbar_restores_prior_state() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let back = open(&mut state, &mut interaction, "Back");
        let front = open(&mut state, &mut interaction, "Front");
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleShade { window_id: front },
        );

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: front },
        );
        let minimized = record(&state, front);
        assert!(minimized.minimized);
        assert!(!minimized.is_focused);
        assert!(!minimized.content_visible());
        assert_eq!(state.focused_window_id(), Some(back));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: front },
        );
        let restored = record(&state, front);
        assert!(!restored.minimized);
        assert!(restored.shaded);
        assert!(restored.is_focused);
        assert_eq!(
            restored.presentation(),
            crate::model::WindowPresentation::Shaded
        );
    }

    #[test]
    fn taskbar_toggle_minimizes_if_focused_and_focuses_otherwise() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let back = open(&mut state, &mut interaction, "Back");
        let front = open(&mut state, &mut interaction, "Front");

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: back },
        );
        assert_eq!(state.focused_window_id(), Some(back));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: back },
        );
        assert!(record(&state, back).minimized);
        assert_eq!(state.focused_window_id(), Some(front));
    }

    #[test]
    fn shade_toggles_content_but_keeps_chrome_and_focus() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = open(&mut state, &mut interaction, "Notes");

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleShade { window_id: win },
        );
        assert!(record(&state, win).shaded);
        assert!(!record(&state, win).content_visible());
        assert!(record(&state, win).is_focused);

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleShade { window_id: win },
        );
        assert!(record(&state, win).content_visible());
    }

    #[test]
    fn zoom_toggles_bounds_without_touching_focus_or_stack() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let back = open(&mut state, &mut interaction, "Back");
        let front = open(&mut state, &mut interaction, "Front");
        let original = record(&state, back).rect;

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleZoom {
                window_id: back,
                viewport: VIEWPORT,
            },
        );
        assert!(record(&state, back).zoomed);
        assert_eq!(record(&state, back).rect, VIEWPORT);
        assert_eq!(state.focused_window_id(), Some(front));
        assert_eq!(state.stacking_order(), vec![back, front]);

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleZoom {
                window_id: back,
                viewport: VIEWPORT,
            },
        );
        assert!(!record(&state, back).zoomed);
        assert_eq!(record(&state, back).rect, original);
    }

    #[test]
    fn focusing_already_focused_top_window_is_noop_for_stack_order() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "First");
        let second = open(&mut state, &mut interaction, "Second");
        let before = state.windows.clone();

        let effects = dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::FocusWindow { window_id: second },
        );

        assert_eq!(state.windows, before);
        assert!(effects.contains(&RuntimeEffect::FocusWindowInput(second)));
    }

    #[test]
    fn clear_focus_leaves_no_window_focused() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        open(&mut state, &mut interaction, "First");
        open(&mut state, &mut interaction, "Second");

        dispatch(&mut state, &mut interaction, DesktopAction::ClearFocus);
        assert_eq!(state.focused_window_id(), None);
    }

    #[test]
    fn moving_window_updates_rect_and_zoomed_windows_stay_put() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = open(&mut state, &mut interaction, "Terminal");
        let original = record(&state, win).rect;

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition::new(10.0, 10.0),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition::new(35.0, 50.0),
            },
        );
        let moved = record(&state, win).rect;
        assert_eq!(moved.x, original.x + 25);
        assert_eq!(moved.y, original.y + 40);
        dispatch(&mut state, &mut interaction, DesktopAction::EndMove);
        assert!(interaction.dragging.is_none());

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleZoom {
                window_id: win,
                viewport: VIEWPORT,
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition::new(0.0, 0.0),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition::new(300.0, 300.0),
            },
        );
        assert_eq!(record(&state, win).rect, VIEWPORT);
    }

    #[test]
    fn far_or_non_finite_drag_pointers_never_overflow() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = open(&mut state, &mut interaction, "Terminal");
        let original = record(&state, win).rect;

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition::new(0.0, 0.0),
            },
        );
        for x in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
            dispatch(
                &mut state,
                &mut interaction,
                DesktopAction::UpdateMove {
                    pointer: PointerPosition::new(x, 0.0),
                },
            );
            assert_eq!(record(&state, win).rect, original);
        }

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition::new(1.0e12, -1.0e12),
            },
        );
        let moved = record(&state, win).rect;
        assert_eq!(moved.x, i32::MAX);
        assert_eq!(moved.y, original.y.saturating_add(i32::MIN));
    }

    #[test]
    fn minimizing_a_zoomed_window_restores_it_zoomed() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let back = open(&mut state, &mut interaction, "Back");
        let front = open(&mut state, &mut interaction, "Front");
        let original = record(&state, front).rect;

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleZoom {
                window_id: front,
                viewport: VIEWPORT,
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow { window_id: front },
        );
        assert!(record(&state, front).minimized);
        assert!(record(&state, front).zoomed);
        assert_eq!(state.focused_window_id(), Some(back));

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleTaskbarWindow { window_id: front },
        );
        let restored = record(&state, front);
        assert!(!restored.minimized);
        assert!(restored.zoomed);
        assert!(restored.is_focused);
        assert_eq!(restored.rect, VIEWPORT);
        assert_eq!(restored.restore_rect, Some(original));
    }

    fn icon(id: &str, x: i32, y: i32) -> DesktopIcon {
        DesktopIcon {
            id: id.to_string(),
            label: id.to_string(),
            rect: WindowRect { x, y, w: 64, h: 64 },
        }
    }

    fn desktop_with_icons() -> (DesktopState, InteractionState) {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::SetDesktopIcons {
                icons: vec![
                    icon("about", 10, 10),
                    icon("projects", 10, 100),
                    icon("resume", 10, 190),
                ],
            },
        );
        (state, interaction)
    }

    fn selected(state: &DesktopState) -> Vec<&str> {
        state.selected_icons.iter().map(String::as_str).collect()
    }

    #[test]
    fn marquee_drag_selects_intersecting_icons() {
        let (mut state, mut interaction) = desktop_with_icons();
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginSelection {
                pointer: PointerPosition::new(200.0, 0.0),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateSelection {
                pointer: PointerPosition::new(50.0, 120.0),
            },
        );
        assert_eq!(selected(&state), vec!["about", "projects"]);
        assert!(interaction
            .selecting
            .as_ref()
            .and_then(|session| session.rect)
            .is_some());

        dispatch(&mut state, &mut interaction, DesktopAction::EndSelection);
        assert!(interaction.selecting.is_none());
        assert_eq!(selected(&state), vec!["about", "projects"]);
    }

    #[test]
    fn click_without_drag_clears_selection() {
        let (mut state, mut interaction) = desktop_with_icons();
        state.selected_icons.insert("about".to_string());

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginSelection {
                pointer: PointerPosition::new(500.0, 500.0),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateSelection {
                pointer: PointerPosition::new(502.0, 501.0),
            },
        );
        assert_eq!(selected(&state), vec!["about"]);
        dispatch(&mut state, &mut interaction, DesktopAction::EndSelection);
        assert!(state.selected_icons.is_empty());
    }

    #[test]
    fn cancel_restores_selection_from_before_the_drag() {
        let (mut state, mut interaction) = desktop_with_icons();
        state.selected_icons.insert("resume".to_string());

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::BeginSelection {
                pointer: PointerPosition::new(0.0, 0.0),
            },
        );
        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateSelection {
                pointer: PointerPosition::new(100.0, 50.0),
            },
        );
        assert_eq!(selected(&state), vec!["about"]);

        dispatch(&mut state, &mut interaction, DesktopAction::CancelSelection);
        assert!(interaction.selecting.is_none());
        assert_eq!(selected(&state), vec!["resume"]);
    }

    #[test]
    fn replacing_icons_drops_stale_selection() {
        let (mut state, mut interaction) = desktop_with_icons();
        state.selected_icons.insert("about".to_string());
        state.selected_icons.insert("projects".to_string());

        dispatch(
            &mut state,
            &mut interaction,
            DesktopAction::SetDesktopIcons {
                icons: vec![icon("projects", 10, 10)],
            },
        );
        assert_eq!(selected(&state), vec!["projects"]);
    }
}
