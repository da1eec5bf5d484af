pub mod dropzone;
pub mod intent;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod store;

pub use dropzone::DropZone;
pub use models::{ChatMessage, FileRef, Role, Session, SessionSummary, StagedFile};
pub use orchestrator::{Orchestrator, OrchestratorSettings, SendError, SendOutcome, SendPath};
pub use store::{SessionStore, StoreError};
