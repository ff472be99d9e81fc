pub mod input;
pub mod print;
