//! Tianji: zodiac year readings for 2026, written by a generative-language
//! provider and delivered as scroll cards.

pub mod api;
pub mod cli;
pub mod config;
pub mod export;
pub mod models;
pub mod oracle;
pub mod provider;
pub mod zodiac;
