pub mod analysis;
pub mod checker;
