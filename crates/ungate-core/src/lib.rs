pub mod config;
pub mod logging;

pub mod defense;
pub mod handlers;
pub mod lifecycle;
pub mod page;
