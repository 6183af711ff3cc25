//! Exception handler bindings.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Framework handler bound when the application ships none.
pub const BASE_EXCEPTION_HANDLER: &str = "Ignitor/Exceptions/BaseExceptionHandler";

/// Catch-all key.
pub const WILDCARD: &str = "*";

/// Binds exception names to handler bindings.
pub trait ExceptionBinder: Send + Sync {
    fn bind(&self, exception: &str, handler: &str);
}

/// In-memory handler table.
#[derive(Debug, Default)]
pub struct ExceptionHandlers {
    handlers: RwLock<HashMap<String, String>>,
}

impl ExceptionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler for `exception`, falling back to the catch-all binding.
    pub fn handler_for(&self, exception: &str) -> Option<String> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers
            .get(exception)
            .or_else(|| handlers.get(WILDCARD))
            .cloned()
    }
}

impl ExceptionBinder for ExceptionHandlers {
    fn bind(&self, exception: &str, handler: &str) {
        tracing::debug!(exception = exception, handler = handler, "Binding exception handler");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(exception.to_string(), handler.to_string());
    }
}
