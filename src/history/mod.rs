pub mod model;
pub mod printer;
pub mod recorder;
pub mod storage;

pub use model::HistoryEntry;
pub use recorder::History;
pub use storage::HistoryStorage;
