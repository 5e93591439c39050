pub mod benchmark;
pub mod cases;
pub mod config;
pub mod runner;
pub mod util;
