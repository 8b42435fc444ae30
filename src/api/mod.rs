mod backend;
mod error;
mod images;
mod scope;

pub use backend::BackendClient;
pub use error::ApiError;
pub use images::ImageResolver;
pub use scope::{FetchOutcome, RequestScope, ScopeHandle};
