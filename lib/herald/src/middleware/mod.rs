//! Tower middleware layers for the herald transport.
//!
//! Layers wrap the [`HyperClient`](crate::HyperClient) service through
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer). The crate
//! ships [`LoggingLayer`]; any tower layer over [`BoxedService`](crate::BoxedService)
//! works the same way.

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::{Layer, ServiceBuilder};
