pub mod kind;
pub mod value;

pub use kind::*;
pub use value::*;
