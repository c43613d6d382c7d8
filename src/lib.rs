pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod focus;
pub mod models;
pub mod notify;
pub mod reconcile;
pub mod state;
pub mod ui;
pub mod view;

pub use api::{HttpTimerApi, TimerApi};
pub use config::{ClientConfig, ControllerSettings, Variant};
pub use controller::{TapOutcome, TimerController};
pub use view::{MemoryView, TimerView};
