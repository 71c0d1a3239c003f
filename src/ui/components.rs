mod list;

pub use list::{List, ListEvent, ListRow};
