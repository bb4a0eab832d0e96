// Per-message frame processing
//
// Each text message goes through parse -> decode -> landmark extraction ->
// classification -> response. Every failure before the response stage turns
// into an error message for that frame; the session itself keeps going.

use crate::protocol::{ErrorResponse, FrameRequest, FrameResponse, ServerMessage};
use signa_core::ServerConfig;
use signa_eye::{frame, ClassificationEngine, LandmarkExtractor, VisionError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const DEFAULT_MAX_FRAME_BYTES: usize = 10 * 1024 * 1024;

/// Where a session's pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    AwaitingFrame,
    Decoding,
    LandmarkExtraction,
    Classifying,
    Responding,
    Terminated,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::AwaitingFrame => "awaiting_frame",
            PipelineStage::Decoding => "decoding",
            PipelineStage::LandmarkExtraction => "landmark_extraction",
            PipelineStage::Classifying => "classifying",
            PipelineStage::Responding => "responding",
            PipelineStage::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Per-frame failures. All of them are reported to the client and none of
/// them close the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("No frame data received")]
    MissingFrame,
    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
    #[error("Image decoding failed: {0}")]
    Decode(String),
    /// Bytes arrived but are not an image in any known format
    #[error("Failed to decode image")]
    Undecodable,
    #[error("Frame processing timed out")]
    Timeout,
    #[error("Frame processing failed: {0}")]
    Processing(String),
}

impl FrameError {
    pub fn binary_frame() -> Self {
        FrameError::InvalidMessage("binary frames are not supported".to_string())
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_string())
    }
}

impl From<VisionError> for FrameError {
    fn from(e: VisionError) -> Self {
        match e {
            VisionError::Image(_) => FrameError::Undecodable,
            other => FrameError::Decode(other.to_string()),
        }
    }
}

/// Turns client messages into responses. Shared by every session.
pub struct FramePipeline {
    engine: Arc<ClassificationEngine>,
    extractor: Arc<dyn LandmarkExtractor>,
    frame_timeout: Option<Duration>,
    max_frame_bytes: usize,
}

impl FramePipeline {
    pub fn new(engine: Arc<ClassificationEngine>, extractor: Arc<dyn LandmarkExtractor>) -> Self {
        Self {
            engine,
            extractor,
            frame_timeout: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }

    pub fn from_config(
        engine: Arc<ClassificationEngine>,
        extractor: Arc<dyn LandmarkExtractor>,
        config: &ServerConfig,
    ) -> Self {
        let timeout = (config.frame_timeout_ms > 0).then(|| Duration::from_millis(config.frame_timeout_ms));
        Self::new(engine, extractor)
            .with_frame_timeout(timeout)
            .with_max_frame_bytes(config.max_frame_bytes)
    }

    pub fn with_frame_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame_timeout = timeout;
        self
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }

    /// Process one text message into exactly one outgoing message
    pub async fn handle_text(&self, text: &str) -> ServerMessage {
        match self.process_text(text).await {
            Ok(response) => {
                debug!("Frame stage: {}", PipelineStage::Responding);
                ServerMessage::Frame(response)
            }
            Err(e) => {
                warn!("Frame rejected: {}", e);
                ServerMessage::Error(e.to_response())
            }
        }
    }

    pub async fn process_text(&self, text: &str) -> Result<FrameResponse, FrameError> {
        let payload = self.parse(text)?;

        let engine = Arc::clone(&self.engine);
        let extractor = Arc::clone(&self.extractor);
        let work = tokio::task::spawn_blocking(move || analyze_frame(&engine, extractor.as_ref(), &payload));

        let joined = match self.frame_timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| FrameError::Timeout)?,
            None => work.await,
        };

        joined.map_err(|e| {
            error!("Frame worker failed: {}", e);
            FrameError::Processing(e.to_string())
        })?
    }

    /// Extract the frame payload from a client message
    pub fn parse(&self, text: &str) -> Result<String, FrameError> {
        if text.len() > self.max_frame_bytes {
            return Err(FrameError::InvalidMessage(format!(
                "message of {} bytes exceeds the {} byte limit",
                text.len(),
                self.max_frame_bytes
            )));
        }

        let request: FrameRequest =
            serde_json::from_str(text).map_err(|e| FrameError::InvalidMessage(e.to_string()))?;
        request.frame.ok_or(FrameError::MissingFrame)
    }
}

/// Decode, detect and classify one frame. CPU-bound; run it off the async workers.
pub fn analyze_frame(
    engine: &ClassificationEngine,
    extractor: &dyn LandmarkExtractor,
    payload: &str,
) -> Result<FrameResponse, FrameError> {
    debug!("Frame stage: {}", PipelineStage::Decoding);
    let image = frame::decode_frame(payload).map_err(|e| {
        error!("Image decoding error: {}", e);
        FrameError::from(e)
    })?;

    debug!("Frame stage: {} ({})", PipelineStage::LandmarkExtraction, extractor.name());
    let pose = match extractor.extract(&image) {
        Ok(pose) => pose,
        Err(e) => {
            error!("Landmark extraction error: {}", e);
            None
        }
    };

    let Some(pose) = pose else {
        return Ok(FrameResponse::no_hand());
    };

    debug!("Frame stage: {}", PipelineStage::Classifying);
    let classification = engine.classify(&pose.to_feature_vector());
    info!(
        "🤟 Detected: {} (confidence: {:.2})",
        classification.label, classification.confidence
    );

    Ok(FrameResponse::detected(&pose, classification))
}
