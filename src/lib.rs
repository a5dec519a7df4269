#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod config;
pub mod icons;
pub mod models;
pub mod spatial;
pub mod ui;
pub use app::StarMapApp;
