mod error;
mod identity;

pub use error::HttpError;
pub use identity::ClientIdentity;
