mod driver;
mod model;

pub use driver::DatabaseDriver;
pub use model::{ColumnDef, Model};
