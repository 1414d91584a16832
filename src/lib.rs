pub mod filter;
pub mod loader;
pub mod output;
pub mod record;
pub mod registry;
pub mod render;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod app;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod timer;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod tests;
