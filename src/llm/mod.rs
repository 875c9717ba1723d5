//! Generative text service clients

pub mod client;
pub mod client_impl;
pub mod factory;

pub use client::{LlmClient, MockLlmClient};
