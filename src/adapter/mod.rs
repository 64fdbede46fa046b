//! Application references: the capability the exception layer writes through.

use crate::error::Result;
use axum::http::StatusCode;
use serde_json::Value;
use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock};

mod axum_adapter;

pub use axum_adapter::{AxumAdapter, ResponseSlot};

/// A platform-native object handed out by an
/// [`ArgumentsHost`](crate::exception::ArgumentsHost), such as the raw response.
pub type HostArgument = dyn Any + Send + Sync;

/// Looks up an adapter at catch time rather than at construction time.
pub type AdapterResolver = Arc<dyn Fn() -> Option<Arc<dyn HttpAdapter>> + Send + Sync>;

/// Abstraction over the HTTP server used to write error replies.
///
/// `response` is the raw outgoing-response object taken from the execution
/// context. Adapters downcast it to their own response type.
pub trait HttpAdapter: Send + Sync + 'static {
    fn reply(&self, response: &HostArgument, body: Value, status: StatusCode) -> Result<()>;

    fn redirect(
        &self,
        response: &HostArgument,
        url: &str,
        status: StatusCode,
        location: &str,
    ) -> Result<()>;
}

/// Late-bound holder for the active [`HttpAdapter`].
///
/// Filters can be built before the server exists; the adapter is bound here once
/// it does and looked up on every catch.
#[derive(Default)]
pub struct HttpAdapterHost {
    adapter: RwLock<Option<Arc<dyn HttpAdapter>>>,
}

impl HttpAdapterHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_adapter(&self, adapter: Arc<dyn HttpAdapter>) {
        *self.adapter.write().unwrap_or_else(PoisonError::into_inner) = Some(adapter);
    }

    pub fn adapter(&self) -> Option<Arc<dyn HttpAdapter>> {
        self.adapter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn resolver(self: &Arc<Self>) -> AdapterResolver {
        let host = Arc::clone(self);
        Arc::new(move || host.adapter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_binds_late() {
        let host = Arc::new(HttpAdapterHost::new());
        let resolver = host.resolver();
        assert!(resolver().is_none());

        host.set_adapter(Arc::new(AxumAdapter));
        assert!(resolver().is_some());
        assert!(host.adapter().is_some());
    }
}
