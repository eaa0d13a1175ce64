mod row;
mod row_set;

pub use row::ResultRow;
pub use row_set::RowSet;
