pub mod app;
pub mod chrome;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod model;
pub mod output;

#[cfg(test)]
mod tests;
