//! Two-player naval combat: fleet placement, shot resolution, and a
//! concurrent registry of game sessions, served in process or over TCP.

mod board;
pub mod client;
mod config;
pub mod domain;
mod error;
mod logging;
pub mod placement;
pub mod protocol;
mod registry;
pub mod server;
mod session;
mod ship;
pub mod transport;
pub mod ui;

pub use board::*;
pub use client::Stub;
pub use config::*;
pub use domain::*;
pub use error::{ErrorKind, GameError};
pub use logging::{init_logging, LOG_ENV};
pub use protocol::{GameApi, Message};
pub use registry::SessionRegistry;
pub use server::{serve, spawn_reaper, Skeleton};
pub use session::*;
pub use ship::*;
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
