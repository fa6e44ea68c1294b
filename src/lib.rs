pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod flatten;
pub mod history;
pub mod launch;
pub mod menu;
pub mod resolver;
pub mod ui;
