// crates/tojson-broker/src/broker.rs
// ============================================================================
// Module: Tojson Composite Broker
// Description: Composite loader and dispatcher wiring sources and a sink.
// Purpose: Load documents by URI scheme and deliver dispatches through a sink.
// Dependencies: tojson-core, url
// ============================================================================

//! ## Overview
//! [`CompositeBroker`] implements the runner's [`DocumentLoader`] by routing
//! document URIs to sources by scheme, and its [`Dispatcher`] by delegating to
//! the configured sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tojson_core::DispatchError;
use tojson_core::DispatchReceipt;
use tojson_core::DispatchRequest;
use tojson_core::Dispatcher;
use tojson_core::DocumentLoader;
use tojson_core::DocumentRef;
use tojson_core::LoadError;
use tojson_core::LoadedDocument;
use url::Url;

use crate::sink::Sink;
use crate::sink::SinkError;
use crate::source::Source;
use crate::source::SourceError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while routing a document load or a dispatch.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// No dispatch sink was registered.
    #[error("no dispatch sink registered")]
    MissingSink,
    /// No document source handles the scheme.
    #[error("missing source for scheme: {0}")]
    MissingSource(String),
    /// The document URI has no parseable scheme.
    #[error("document uri is malformed: {0}")]
    InvalidUri(String),
    /// The document source failed; the core error adds the load context.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The dispatch sink failed; the core error adds the dispatch context.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<BrokerError> for LoadError {
    fn from(err: BrokerError) -> Self {
        Self::Failed(err.to_string())
    }
}

impl From<BrokerError> for DispatchError {
    fn from(err: BrokerError) -> Self {
        if let BrokerError::Sink(SinkError::Rejected {
            status,
            message,
        }) = err
        {
            return Self::Rejected {
                status,
                message,
            };
        }
        Self::DispatchFailed(err.to_string())
    }
}

// ============================================================================
// SECTION: Composite Broker
// ============================================================================

/// Collects document sources and the dispatch sink for a [`CompositeBroker`].
#[derive(Default)]
pub struct CompositeBrokerBuilder {
    /// Document sources by URI scheme.
    sources: BTreeMap<String, Arc<dyn Source>>,
    /// Dispatch destination.
    sink: Option<Arc<dyn Sink>>,
}

impl CompositeBrokerBuilder {
    /// Serves documents whose URI scheme is `scheme` from `source`.
    /// A later registration for the same scheme replaces the earlier one.
    #[must_use]
    pub fn source(mut self, scheme: impl Into<String>, source: impl Source + 'static) -> Self {
        let source: Arc<dyn Source> = Arc::new(source);
        self.sources.insert(scheme.into(), source);
        self
    }

    /// Sends dispatches to `sink`.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        let sink: Arc<dyn Sink> = Arc::new(sink);
        self.sink = Some(sink);
        self
    }

    /// Finishes the broker.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::MissingSink`] when [`Self::sink`] was never called.
    pub fn build(self) -> Result<CompositeBroker, BrokerError> {
        let Some(sink) = self.sink else {
            return Err(BrokerError::MissingSink);
        };
        Ok(CompositeBroker {
            sources: self.sources,
            sink,
        })
    }
}

/// Document loader and dispatcher for one action run.
pub struct CompositeBroker {
    /// Document sources by URI scheme.
    sources: BTreeMap<String, Arc<dyn Source>>,
    /// Dispatch destination.
    sink: Arc<dyn Sink>,
}

impl CompositeBroker {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> CompositeBrokerBuilder {
        CompositeBrokerBuilder::default()
    }

    /// Picks the source for `uri`; `base+variant` schemes fall back to `base`.
    fn resolve_source(&self, uri: &str) -> Result<&dyn Source, BrokerError> {
        let url = Url::parse(uri).map_err(|err| BrokerError::InvalidUri(err.to_string()))?;
        let scheme = url.scheme();
        let base = scheme.split_once('+').map(|(base, _)| base);
        [Some(scheme), base]
            .into_iter()
            .flatten()
            .find_map(|candidate| self.sources.get(candidate))
            .map(|source| &**source)
            .ok_or_else(|| BrokerError::MissingSource(scheme.to_string()))
    }

    /// Loads the raw document bytes for `reference`.
    fn fetch(&self, reference: &DocumentRef) -> Result<LoadedDocument, BrokerError> {
        let payload = self.resolve_source(&reference.uri)?.fetch(reference)?;
        Ok(LoadedDocument {
            bytes: payload.bytes,
            content_type: payload.content_type,
        })
    }
}

impl DocumentLoader for CompositeBroker {
    fn load(&self, reference: &DocumentRef) -> Result<LoadedDocument, LoadError> {
        Ok(self.fetch(reference)?)
    }
}

impl Dispatcher for CompositeBroker {
    fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        self.sink.deliver(request).map_err(|err| BrokerError::Sink(err).into())
    }
}
