pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::Session;
pub use requests::{ChangePasswordRequest, LoginRequest};
pub use responses::{CurrentSessionResponse, LoginResponse, SessionListResponse};
