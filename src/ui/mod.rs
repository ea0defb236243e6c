pub mod json;
pub mod output;
pub mod terminal;
