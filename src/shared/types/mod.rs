pub mod errors;
pub mod upsert;

pub use errors::*;
pub use upsert::*;
