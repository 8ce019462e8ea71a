pub mod input;
pub mod screen;
pub mod terminal;

pub use input::{parse_action, UserAction};
pub use screen::{history_rows, row_value, HistoryRow, Screen};
pub use terminal::{dispatch, run_screen};
