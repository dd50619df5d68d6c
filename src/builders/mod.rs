mod model;
mod query;

pub use model::{build_delete_by_id, build_select_by_id, build_upsert};
pub use query::{Query, QueryKind};
