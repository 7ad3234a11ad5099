//! Valuation Lead Relay Library
//!
//! This library provides the core functionality for the car-valuation lead
//! relay: boundary parsing of form submissions, chat message rendering and
//! delivery to a Telegram chat through the Bot API.
//!
//! # Modules
//!
//! - `api`: HTTP layer (router, state, endpoints), re-exported by layer.
//! - `core`: Domain layer (form schema, message rendering, models).
//! - `integrations`: External service clients.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: Shared state and health endpoints.
//! - `lead_form`: Lead-capture form schema.
//! - `message_format`: Chat message rendering and escaping.
//! - `models`: Core data models.
//! - `telegram_client`: Telegram Bot API client.
//! - `valuation_handler`: Lead submission endpoint.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod lead_form;
pub mod message_format;
pub mod models;
pub mod telegram_client;
pub mod valuation_handler;
