pub mod cli;
pub mod portero;
pub mod store;
