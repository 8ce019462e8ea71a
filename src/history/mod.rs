pub mod codec;
pub mod list;
pub mod store;

pub use list::HistoryList;
pub use store::{HistoryStore, HISTORY_KEY, HISTORY_NAMESPACE};
