pub mod api;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod grades;
pub mod models;
pub mod view;
