// src/lib.rs

//! newsrelay library: forwards new listing-page articles to Telegram.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
