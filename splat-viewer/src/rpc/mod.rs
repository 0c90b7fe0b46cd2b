//! JSON-RPC 2.0 communication layer for host page integration.
//!
//! When the viewer runs inside an iframe, the parent page drives it through
//! `postMessage` and receives scene status updates the same way.
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Methods
//!
//! - `load_scene { url }`: replace the current scene. Superseded loads are dropped.
//! - `unmount_scene`: release the current scene and return to idle.
//! - `get_status`: current scene status (`idle`, `loading`, `ready`, `error`).
//! - `resize { width, height }`: viewport size in logical pixels.
//!
//! ## Notifications
//!
//! - `scene_status`: sent on every status change, with the same payload as
//!   `get_status`. Errors carry `kind` (`fetch` or `decode`) and `message`.
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// JSON-RPC 2.0 bidirectional communication system for host integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
