// Wire messages for the streaming channel and the status endpoints

use serde::{Deserialize, Serialize};
use signa_core::{GestureLabel, HandPose, Landmark};
use signa_eye::{Classification, Tier};

/// Client to server: one frame per message
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRequest {
    #[serde(default)]
    pub frame: Option<String>,
}

/// Server to client: result for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResponse {
    pub timestamp: f64,
    pub hand_detected: bool,
    pub landmarks: Vec<Landmark>,
    pub gesture: GestureLabel,
    pub confidence: f32,
    /// Which classifier tier answered, `null` without a hand
    pub classifier: Option<Tier>,
}

impl FrameResponse {
    /// No hand in the frame. Not an error.
    pub fn no_hand() -> Self {
        Self {
            timestamp: epoch_seconds(),
            hand_detected: false,
            landmarks: Vec::new(),
            gesture: GestureLabel::None,
            confidence: 0.0,
            classifier: None,
        }
    }

    pub fn detected(pose: &HandPose, classification: Classification) -> Self {
        Self {
            timestamp: epoch_seconds(),
            hand_detected: true,
            landmarks: pose.landmarks().to_vec(),
            gesture: classification.label,
            confidence: classification.confidence,
            classifier: Some(classification.tier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Anything the server pushes down a streaming connection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Frame(FrameResponse),
    Error(ErrorResponse),
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error(_))
    }
}

impl From<FrameResponse> for ServerMessage {
    fn from(response: FrameResponse) -> Self {
        ServerMessage::Frame(response)
    }
}

impl From<ErrorResponse> for ServerMessage {
    fn from(response: ErrorResponse) -> Self {
        ServerMessage::Error(response)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub active_connections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub websocket: String,
    pub health: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub endpoints: Endpoints,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            message: "ASL Translation Server".to_string(),
            endpoints: Endpoints {
                websocket: "/asl-ws".to_string(),
                health: "/health".to_string(),
            },
        }
    }
}

/// Seconds since the Unix epoch with sub-second precision
pub fn epoch_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
