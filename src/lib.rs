pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod logging;
pub mod navigation;
pub mod output;
pub mod pagination;
pub mod session;

#[cfg(test)]
mod tests;
