pub mod http;
pub mod pipeline;
pub mod protocol;
pub mod session;
pub mod startup;
pub mod websocket;

pub use http::{create_router, AppState};
pub use pipeline::{FrameError, FramePipeline, PipelineStage};
pub use session::{SessionError, SessionGuard, SessionManager};
