pub mod gender;
pub mod pagination;
pub mod response;

pub use gender::Gender;
pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_optional_number,
};
pub use response::ApiResponse;
