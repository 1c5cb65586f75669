pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use highscores::*;
pub use level::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod highscores;
mod level;
mod session;
mod types;
