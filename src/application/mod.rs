//! # Application Layer
//!
//! Ports and the turn orchestration use case coordinating the domain and
//! connector layers.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
