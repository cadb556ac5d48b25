pub mod auth;
pub mod body;
pub mod composer;
pub mod draft;

pub use auth::{ApiKeyLocation, Auth, AuthConfig, AuthInjector, AuthKind};
pub use composer::Composer;
pub use draft::{BodyType, KeyValue, RequestDraft};
