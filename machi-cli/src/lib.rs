//! Machi CLI library for interactive AI agent conversations.
//!
//! This crate provides CLI tools for the Machi AI Agent Framework.

pub mod chatbot;

pub use chatbot::{ChatBot, ChatBotConfig};
