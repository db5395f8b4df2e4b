mod catalog;
mod completion;
mod message;
mod parameters;
mod turn;

pub use catalog::*;
pub use completion::*;
pub use message::*;
pub use parameters::*;
pub use turn::*;
