pub mod errors;
pub mod nodes;
pub mod types;
pub mod values;

pub use errors::*;
pub use nodes::*;
pub use types::*;
pub use values::*;
