// Shared fixtures for the server integration tests
#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use signa_core::{FeatureVector, HandPose, Landmark, ServerConfig};
use signa_eye::{frame, ClassificationEngine, ClassifierError, LandmarkExtractor, ScoreModel, VisionError};
use signa_server::startup::serve;
use signa_server::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const TIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// All five fingertips above their reference joints
pub fn open_hand() -> HandPose {
    let mut landmarks = [Landmark::new(0.5, 0.5, 0.0); 21];
    for tip in TIPS {
        landmarks[tip].y = 0.1;
    }
    HandPose::new(landmarks)
}

/// Always reports the same pose
pub struct StubExtractor(pub HandPose);

impl LandmarkExtractor for StubExtractor {
    fn extract(&self, _image: &DynamicImage) -> Result<Option<HandPose>, VisionError> {
        Ok(Some(self.0.clone()))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Detects a hand, but only after a delay
pub struct SlowExtractor(pub Duration);

impl LandmarkExtractor for SlowExtractor {
    fn extract(&self, _image: &DynamicImage) -> Result<Option<HandPose>, VisionError> {
        std::thread::sleep(self.0);
        Ok(Some(open_hand()))
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Score model with a fixed answer
pub struct FixedModel(pub Vec<f32>);

impl ScoreModel for FixedModel {
    fn scores(&self, _features: &FeatureVector) -> Result<Vec<f32>, ClassifierError> {
        Ok(self.0.clone())
    }
}

pub fn frame_payload() -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([220, 190, 170])));
    frame::encode_png_frame(&image).unwrap()
}

pub fn frame_message() -> String {
    serde_json::json!({ "frame": frame_payload() }).to_string()
}

pub fn rule_based_state(extractor: Arc<dyn LandmarkExtractor>, config: &ServerConfig) -> AppState {
    AppState::new(Arc::new(ClassificationEngine::rule_based()), extractor, config)
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start(state: AppState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(serve(listener, state.clone(), async {
            let _ = rx.await;
        }));

        Self {
            addr,
            state,
            shutdown: Some(tx),
        }
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Poll the session count until it matches or the deadline passes
    pub async fn wait_for_sessions(&self, expected: usize) -> bool {
        for _ in 0..200 {
            if self.state.sessions.count() == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
