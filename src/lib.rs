pub mod api;
pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod relay;
