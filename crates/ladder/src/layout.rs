pub mod dimensions;
mod engines;
pub mod positioning;

pub use engines::{Engine, Strategy, layout};
