use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow, WindowFocused};

use crate::engine::camera::navigator::{MoveKey, Navigator};

const KEY_BINDINGS: [(MoveKey, &[KeyCode]); 6] = [
    (MoveKey::Forward, &[KeyCode::KeyW, KeyCode::ArrowUp]),
    (MoveKey::Back, &[KeyCode::KeyS, KeyCode::ArrowDown]),
    (MoveKey::Left, &[KeyCode::KeyA, KeyCode::ArrowLeft]),
    (MoveKey::Right, &[KeyCode::KeyD, KeyCode::ArrowRight]),
    (MoveKey::Up, &[KeyCode::Space, KeyCode::KeyE]),
    (MoveKey::Down, &[KeyCode::KeyQ, KeyCode::ControlLeft]),
];

pub fn set_cursor_capture(window: &mut Window, captured: bool) {
    if captured {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    } else {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Watches the browser's pointer lock. The browser consumes Escape itself
/// when it drops the lock, so the loss has to be noticed by polling.
#[derive(Resource, Debug, Default)]
pub struct PointerLockWatch {
    granted: bool,
}

impl PointerLockWatch {
    /// Feed the current lock state. Returns true once when a lock granted
    /// since the last engage has gone away. A lock that has not arrived yet
    /// does not count as lost.
    pub fn observe(&mut self, engaged: bool, locked: bool) -> bool {
        if !engaged {
            self.granted = false;
            return false;
        }
        if locked {
            self.granted = true;
            return false;
        }
        std::mem::take(&mut self.granted)
    }
}

/// Whether the page currently holds pointer lock. Unknown off the web.
#[cfg(target_arch = "wasm32")]
fn pointer_locked() -> Option<bool> {
    let document = web_sys::window()?.document()?;
    Some(document.pointer_lock_element().is_some())
}

#[cfg(not(target_arch = "wasm32"))]
fn pointer_locked() -> Option<bool> {
    None
}

/// Click engages; Escape, focus loss or a dropped pointer lock releases.
pub fn handle_capture_gestures(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut focus_events: EventReader<WindowFocused>,
    mut lock_watch: ResMut<PointerLockWatch>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut navigators: Query<&mut Navigator>,
) {
    let focus_lost = focus_events.read().any(|event| !event.focused);
    let engaged = navigators.iter().any(|navigator| navigator.is_engaged());
    let lock_lost = pointer_locked().is_some_and(|locked| lock_watch.observe(engaged, locked));
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    for mut navigator in &mut navigators {
        if navigator.is_engaged() {
            if keys.just_pressed(KeyCode::Escape) || focus_lost || lock_lost {
                navigator.release();
                set_cursor_capture(&mut window, false);
                debug!("Pointer released");
            }
        } else if mouse_buttons.just_pressed(MouseButton::Left) {
            navigator.engage();
            set_cursor_capture(&mut window, true);
            debug!("Pointer captured");
        }
    }
}

pub fn collect_movement_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut navigators: Query<&mut Navigator>,
) {
    for mut navigator in &mut navigators {
        if !navigator.is_engaged() {
            continue;
        }
        for (key, bindings) in KEY_BINDINGS {
            navigator.set_key(key, keys.any_pressed(bindings.iter().copied()));
        }
    }
}

/// Pointer motion turns the camera while captured, or while right-dragging
/// when not.
pub fn apply_look(
    mut motion: EventReader<MouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut navigators: Query<&mut Navigator>,
) {
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let dragging = mouse_buttons.pressed(MouseButton::Right);
    for mut navigator in &mut navigators {
        if navigator.is_engaged() || dragging {
            navigator.look(delta);
        }
    }
}

pub fn apply_navigation(time: Res<Time>, mut cameras: Query<(&mut Navigator, &mut Transform)>) {
    let delta_seconds = time.delta_secs();
    for (mut navigator, mut transform) in &mut cameras {
        navigator.update(delta_seconds);
        let next = navigator.transform();
        if *transform != next {
            *transform = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_lock_is_not_a_loss() {
        let mut watch = PointerLockWatch::default();
        assert!(!watch.observe(true, false));
        assert!(!watch.observe(true, false));
    }

    #[test]
    fn dropped_lock_is_reported_once() {
        let mut watch = PointerLockWatch::default();
        assert!(!watch.observe(true, true));
        assert!(watch.observe(true, false));
        assert!(!watch.observe(true, false));
    }

    #[test]
    fn release_forgets_granted_lock() {
        let mut watch = PointerLockWatch::default();
        watch.observe(true, true);
        assert!(!watch.observe(false, false));
        // A fresh engage waits for the lock again.
        assert!(!watch.observe(true, false));
    }
}
