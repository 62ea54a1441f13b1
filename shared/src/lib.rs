pub mod error;
pub mod reference;
pub mod validator;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use reference::{EntityRef, HttpReferenceClient, ReferenceClient, ReferenceError};
pub use validator::ReferenceValidator;
