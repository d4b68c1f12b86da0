//! Media upload pipeline — connectivity preflight, multipart submit,
//! explicit task records.

pub mod probe;
pub mod task;
pub mod uploader;

pub use probe::{ConnectivityProbe, HttpConnectivityProbe};
pub use task::{UploadStatus, UploadTask};
pub use uploader::{MediaUploader, UploadReceipt, Uploader};
