//! chat_core - Core types and configuration for the chat relay
//!
//! This crate provides the foundational types used across the relay crates:
//! - `message` - conversation turn types shared by store, composer and gateway
//! - `config` - backend endpoint configuration

pub mod config;
pub mod message;

// Re-export commonly used types
pub use config::Config;
pub use message::{ChatMessage, Role};
