// crates/tojson-broker/src/lib.rs
// ============================================================================
// Module: Tojson Broker Library
// Description: Document sources, dispatch sinks, and the composite broker.
// Purpose: Load YAML documents and deliver dispatches for the action runner.
// Dependencies: tojson-core, reqwest, url
// ============================================================================

//! ## Overview
//! Tojson Broker provides ready-made source and sink implementations plus a
//! composite broker that implements the runner's
//! [`tojson_core::DocumentLoader`] and [`tojson_core::Dispatcher`] seams.
//! All network access goes through the [`HttpTransport`] trait so hosts and
//! tests can swap the HTTP client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod broker;
pub mod sink;
pub mod source;
pub mod transport;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use broker::BrokerError;
pub use broker::CompositeBroker;
pub use broker::CompositeBrokerBuilder;
pub use sink::GithubSink;
pub use sink::Sink;
pub use sink::SinkError;
pub use source::FileSource;
pub use source::HttpSource;
pub use source::InlineSource;
pub use source::MAX_SOURCE_BYTES;
pub use source::Source;
pub use source::SourceError;
pub use source::SourcePayload;
pub use transport::ApiRequest;
pub use transport::ApiResponse;
pub use transport::HttpMethod;
pub use transport::HttpTransport;
pub use transport::ReqwestTransport;
pub use transport::ReqwestTransportConfig;
pub use transport::TransportError;
