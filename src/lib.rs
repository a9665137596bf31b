mod assist;
mod board;
mod config;
mod error;
mod matching;
mod moves;
mod position;
mod resolution;
mod session;

pub use crate::assist::*;
pub use crate::board::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::matching::*;
pub use crate::moves::*;
pub use crate::position::*;
pub use crate::resolution::*;
pub use crate::session::*;
