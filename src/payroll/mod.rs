pub mod engine;
pub mod month;
