use bevy::prelude::*;
use serde::Serialize;
use splat_scene::DecodeReport;

/// Viewer lifecycle. Navigation and per-frame scene work only run in `Ready`;
/// leaving `Ready` tears the mounted scene down.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerPhase {
    #[default]
    Configuring,
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Which side of the pipeline a load failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneErrorKind {
    /// The scene bytes could not be retrieved.
    Fetch,
    /// The bytes arrived but hold no usable scene data.
    Decode,
}

/// Observable scene status for the surrounding UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SceneStatus {
    Idle,
    Loading {
        path: String,
    },
    Ready {
        path: String,
        points: usize,
        report: DecodeReport,
    },
    Error {
        path: String,
        kind: SceneErrorKind,
        /// Stable decode failure identifier, e.g. `no_header_end`.
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<&'static str>,
        message: String,
    },
}

impl SceneStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready { .. } => "ready",
            Self::Error { .. } => "error",
        }
    }
}

/// Latest status, readable at any time.
#[derive(Resource, Debug, Clone)]
pub struct ViewerStatus(pub SceneStatus);

impl Default for ViewerStatus {
    fn default() -> Self {
        Self(SceneStatus::Idle)
    }
}

/// Emitted on every status change.
#[derive(Event, Debug, Clone)]
pub struct SceneStatusChanged(pub SceneStatus);

/// Record a new status and announce it.
pub fn publish_status(
    status: &mut ViewerStatus,
    events: &mut EventWriter<SceneStatusChanged>,
    next: SceneStatus,
) {
    match &next {
        SceneStatus::Error { path, message, .. } => {
            error!("Scene {} failed: {}", path, message)
        }
        other => info!("Scene status → {}", other.label()),
    }
    status.0 = next.clone();
    events.write(SceneStatusChanged(next));
}

pub fn log_phase_transitions(mut transitions: EventReader<StateTransitionEvent<ViewerPhase>>) {
    for transition in transitions.read() {
        debug!(
            "→ Viewer phase {:?} -> {:?}",
            transition.exited, transition.entered
        );
    }
}
