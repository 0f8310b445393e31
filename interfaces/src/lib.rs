pub mod defs;
pub mod state;
