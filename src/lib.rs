pub mod api;
pub mod calc;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod gateway;
pub mod input;
pub mod model;
pub mod state;
pub mod sync;
pub mod ui;
