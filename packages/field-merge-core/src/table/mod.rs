//! Record tables with atomic conditional updates.

mod column;
mod record;
mod row_buffer;
#[allow(clippy::module_inception)]
mod table;

pub use column::Column;
pub use record::Record;
pub use table::Table;
