use bevy::prelude::*;
use bevy::window::PresentMode;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            title: "Splat Viewer".into(),
            canvas: Some("#bevy".into()),
            // Host page resizes propagate through the canvas parent.
            fit_canvas_to_parent: true,
            prevent_default_event_handling: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Splat Viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
