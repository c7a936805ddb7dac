//! Remote inference gateway.
//!
//! A uniform wrapper over the external AI services the pages call:
//!
//! * [`InferenceGateway`] — async trait implemented by all backends.
//! * [`ApiGateway`] — HTTP/JSON implementation built from [`GatewayConfig`].
//! * [`Detection`] / [`Classification`] — result value types with strict
//!   greater-than threshold acceptance.
//! * [`GatewayError`] — error variants for remote calls.
//!
//! [`GatewayConfig`]: crate::config::GatewayConfig

pub mod client;
pub mod types;

pub use client::{ApiGateway, GatewayError, InferenceGateway};
pub use types::{Classification, Detection};
