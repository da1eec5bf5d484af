pub mod chat;
pub mod uploads;
pub mod vector;

pub use chat::{ChatRelay, ChatRelayReply, ChatRelayRequest};
pub use uploads::{UploadError, UploadRecord, UploadStore};
pub use vector::{ReadFileRequest, VectorRelay};
