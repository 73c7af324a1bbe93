//! Observation contexts and the filter/handler pipeline that runs when an
//! observation stops.
//!
//! An [`ObservationContext`] describes one observed operation. When the
//! operation finishes, [`ObservationRegistry::stop`] passes the context
//! through every registered [`ObservationFilter`] (which may add key
//! values) and then hands the result to every [`ObservationHandler`]
//! (which exports it somewhere, e.g. onto the current tracing span).

pub mod chat;
pub mod filter;

use std::sync::Arc;

pub use chat::ChatModelObservationContext;

/// Ordered bag of string key/value pairs.
///
/// Appending never deduplicates: pushing the same key twice keeps both
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues(Vec<(String, String)>);

impl KeyValues {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Value of the most recently added entry for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values recorded for `key`, oldest first.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Context for an observation that no filter in this crate understands.
#[derive(Debug, Clone)]
pub struct GenericObservationContext {
    pub name: String,
    pub low_cardinality: KeyValues,
    pub high_cardinality: KeyValues,
}

impl GenericObservationContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            low_cardinality: KeyValues::default(),
            high_cardinality: KeyValues::default(),
        }
    }
}

/// A finished (or finishing) observation.
#[derive(Debug, Clone)]
pub enum ObservationContext {
    /// A chat-model call with its request and optional response.
    ChatModel(ChatModelObservationContext),
    /// Any other kind of observation.
    Other(GenericObservationContext),
}

/// Observation name used for chat-model calls.
pub const CHAT_MODEL_OBSERVATION_NAME: &str = "gen_ai.client.operation";

impl ObservationContext {
    pub fn name(&self) -> &str {
        match self {
            Self::ChatModel(_) => CHAT_MODEL_OBSERVATION_NAME,
            Self::Other(ctx) => &ctx.name,
        }
    }

    /// Borrow the chat-model view of this context, if it is one.
    pub fn as_chat_model(&self) -> Option<&ChatModelObservationContext> {
        match self {
            Self::ChatModel(ctx) => Some(ctx),
            Self::Other(_) => None,
        }
    }

    /// Mutable chat-model view of this context, if it is one.
    pub fn as_chat_model_mut(&mut self) -> Option<&mut ChatModelObservationContext> {
        match self {
            Self::ChatModel(ctx) => Some(ctx),
            Self::Other(_) => None,
        }
    }

    pub fn low_cardinality(&self) -> &KeyValues {
        match self {
            Self::ChatModel(ctx) => &ctx.low_cardinality,
            Self::Other(ctx) => &ctx.low_cardinality,
        }
    }

    pub fn high_cardinality(&self) -> &KeyValues {
        match self {
            Self::ChatModel(ctx) => &ctx.high_cardinality,
            Self::Other(ctx) => &ctx.high_cardinality,
        }
    }
}

impl From<ChatModelObservationContext> for ObservationContext {
    fn from(ctx: ChatModelObservationContext) -> Self {
        Self::ChatModel(ctx)
    }
}

impl From<GenericObservationContext> for ObservationContext {
    fn from(ctx: GenericObservationContext) -> Self {
        Self::Other(ctx)
    }
}

/// Transforms a context before handlers see it.
///
/// Filters must pass through contexts they do not recognise unchanged.
pub trait ObservationFilter: Send + Sync {
    fn map(&self, context: ObservationContext) -> ObservationContext;
}

/// Receives stopped observations.
pub trait ObservationHandler: Send + Sync {
    fn supports_context(&self, _context: &ObservationContext) -> bool {
        true
    }

    fn on_stop(&self, context: &ObservationContext);
}

/// Ordered set of filters and handlers applied when an observation stops.
#[derive(Clone, Default)]
pub struct ObservationRegistry {
    filters: Vec<Arc<dyn ObservationFilter>>,
    handlers: Vec<Arc<dyn ObservationHandler>>,
}

impl ObservationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl ObservationFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn with_handler(mut self, handler: impl ObservationHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Run all filters in registration order, then notify every handler
    /// that supports the resulting context.
    pub fn stop(&self, context: ObservationContext) -> ObservationContext {
        let context = self
            .filters
            .iter()
            .fold(context, |ctx, filter| filter.map(ctx));

        for handler in &self.handlers {
            if handler.supports_context(&context) {
                handler.on_stop(&context);
            }
        }

        context
    }
}

impl std::fmt::Debug for ObservationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationRegistry")
            .field("filters", &self.filters.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
