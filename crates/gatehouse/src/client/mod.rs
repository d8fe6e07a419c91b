//! [`ServiceClient`](crate::session::ServiceClient) implementations.
//!
//! Gatehouse does not own the remote service's protocol. [`tcp::TcpClient`] is a
//! small reference client that speaks one JSON object per line, enough for the
//! bundled tasks and for end-to-end tests against [`local::LocalService`].

pub mod local;
pub mod tcp;

pub use local::LocalService;
pub use tcp::{TcpClient, TcpSession};
