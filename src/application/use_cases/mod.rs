mod submit_turn;

pub use submit_turn::*;
