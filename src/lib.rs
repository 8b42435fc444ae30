pub mod api;
pub mod catalog;
pub mod config;
pub mod countdown;
pub mod events;
pub mod location;
pub mod preview;
pub mod state;
