//! # wsrelay
//!
//! `wsrelay` is a minimalist, in-memory topic relay built with Rust.
//! Clients connect over WebSockets, subscribe to a topic with
//! `subscribe:<topic>` and publish files with
//! `message:<topic>:<mime-type>:<filename>:<data>`. Every other subscriber
//! of the topic receives `<mime-type>:<filename>:<data>` unchanged, as a
//! frame of the same kind. Nothing is persisted.
//!
//! ## Core Modules
//!
//! - `broker`: the subscription registry and the router that fans out publishes.
//! - `client`: connection identity and the per-connection lifecycle tracker.
//! - `config`: loading settings from defaults, a config file, the environment and the command line.
//! - `transport`: the wire format and the WebSocket server feeding the router.
//! - `utils`: error types and logging.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
