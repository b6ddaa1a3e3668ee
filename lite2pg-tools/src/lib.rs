#[cfg(any(test, feature = "test_utilities"))]
pub mod test_helpers;

mod ddl_query_builder;
mod error;
mod models;
mod pipeline;
mod quoting;
mod report;
mod schema_reader;
mod source;
mod storage;
mod type_mapper;

pub use error::*;
pub use models::*;
pub use pipeline::*;
pub use quoting::quote_identifier;
pub use report::*;
pub use schema_reader::{normalize, SchemaReader};
pub use source::*;
pub use storage::*;
pub use type_mapper::*;
