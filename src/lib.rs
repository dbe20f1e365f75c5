//! Tailor Tutor - a terminal client for the Tailor Tutor learning service
//!
//! Browse subjects and chapters, read topics one at a time and ask the
//! tutor questions about what you are reading.

pub mod api;
pub mod app;
pub mod config;
pub mod document;
pub mod theme;
pub mod ui;
pub mod views;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
