pub mod config;
pub use config::*;
pub mod counter;
pub use counter::{Counter, Strategy, Tally};
pub mod error;
pub use error::*;
pub mod parser;
pub use parser::*;
