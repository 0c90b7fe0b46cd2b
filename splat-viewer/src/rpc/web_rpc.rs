use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::{Deserialize, Serialize};

use crate::engine::core::app_state::{SceneStatusChanged, ViewerStatus};
use crate::engine::loading::scene_loader::{LoadSceneRequest, UnmountSceneRequest};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

/// A validated host request.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCommand {
    LoadScene { url: String },
    UnmountScene,
    GetStatus,
    Resize { width: f32, height: f32 },
}

impl RpcCommand {
    pub fn parse(request: &RpcRequest) -> Result<Self, RpcError> {
        match request.method.as_str() {
            "load_scene" => {
                #[derive(Deserialize)]
                struct LoadSceneParams {
                    url: String,
                }

                let params = serde_json::from_value::<LoadSceneParams>(request.params.clone())
                    .map_err(|_| RpcError::invalid_params("Expected 'url' parameter"))?;
                if params.url.trim().is_empty() {
                    return Err(RpcError::invalid_params("'url' must not be empty"));
                }
                Ok(Self::LoadScene { url: params.url })
            }
            "unmount_scene" => Ok(Self::UnmountScene),
            "get_status" => Ok(Self::GetStatus),
            "resize" => {
                #[derive(Deserialize)]
                struct ResizeParams {
                    width: f32,
                    height: f32,
                }

                let params = serde_json::from_value::<ResizeParams>(request.params.clone())
                    .map_err(|_| RpcError::invalid_params("Expected 'width' and 'height'"))?;
                let valid = |v: f32| v.is_finite() && v > 0.0;
                if !valid(params.width) || !valid(params.height) {
                    return Err(RpcError::invalid_params(
                        "'width' and 'height' must be positive",
                    ));
                }
                Ok(Self::Resize {
                    width: params.width,
                    height: params.height,
                })
            }
            other => Err(RpcError::method_not_found(other)),
        }
    }
}

/// Resource managing bidirectional RPC communication with the host page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the WebRPC layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_scene_status,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available; host messages disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    status: Res<ViewerStatus>,
    mut load_requests: EventWriter<LoadSceneRequest>,
    mut unmount_requests: EventWriter<UnmountSceneRequest>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Ignoring malformed RPC message: {}", parse_error);
                continue;
            }
        };

        let result = RpcCommand::parse(&request).and_then(|command| match command {
            RpcCommand::LoadScene { url } => {
                info!("Host requested scene {}", url);
                load_requests.write(LoadSceneRequest { path: url.clone() });
                Ok(serde_json::json!({ "accepted": true, "url": url }))
            }
            RpcCommand::UnmountScene => {
                unmount_requests.write(UnmountSceneRequest);
                Ok(serde_json::json!({ "accepted": true }))
            }
            RpcCommand::GetStatus => serde_json::to_value(&status.0)
                .map_err(|e| RpcError::internal_error(&e.to_string())),
            RpcCommand::Resize { width, height } => {
                let Ok(mut window) = windows.single_mut() else {
                    return Err(RpcError::internal_error("No primary window"));
                };
                window.resolution.set(width, height);
                debug!("Viewport resized to {}x{}", width, height);
                Ok(serde_json::json!({ "width": width, "height": height }))
            }
        });

        if let Err(error) = &result {
            if error.code == -32601 {
                warn!("Unknown RPC method: {}", request.method);
            }
        }

        // Only requests with IDs get responses; notifications have none.
        let Some(id) = request.id else {
            continue;
        };
        rpc_interface.queue_response(create_response(id, result));
    }
}

/// Mirror every scene status change to the host.
fn forward_scene_status(
    mut status_events: EventReader<SceneStatusChanged>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for SceneStatusChanged(status) in status_events.read() {
        match serde_json::to_value(status) {
            Ok(params) => rpc_interface.send_notification("scene_status", params),
            Err(e) => error!("Failed to serialize scene status: {}", e),
        }
    }
}

fn create_response(id: serde_json::Value, result: Result<serde_json::Value, RpcError>) -> RpcResponse {
    match result {
        Ok(value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}
