mod column;
mod foreign_key;
mod index;
mod table;

pub use column::*;
pub use foreign_key::*;
pub use index::*;
pub use table::*;
