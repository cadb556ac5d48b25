pub mod model;
pub mod store;

pub use model::{Collection, CollectionRequest};
pub use store::CollectionStore;
