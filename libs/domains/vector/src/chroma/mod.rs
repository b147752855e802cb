mod client;
mod config;

pub use client::ChromaIndex;
pub use config::ChromaConfig;
