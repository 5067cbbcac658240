//! Request and response DTOs for the stash API.

pub mod request;
pub mod response;

pub use request::{LoginRequest, RegisterRequest};
pub use response::{
    AuthResponse, FileInfo, FileResponse, MessageResponse, UploadResponse, UserInfo,
};
