mod page_store;
mod pagination;
mod repository;

pub use page_store::*;
pub use pagination::*;
pub use repository::*;
