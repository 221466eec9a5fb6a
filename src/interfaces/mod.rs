//! Interface layer - adapters to the outside world

pub mod http;
