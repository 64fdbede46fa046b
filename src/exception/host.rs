use crate::adapter::{HostArgument, ResponseSlot};
use axum::http::{Method, Uri};
use std::sync::Arc;

/// Index of the raw outgoing response among the host arguments.
pub const RESPONSE_ARG_INDEX: usize = 1;

/// Method and URI of the request being handled, stored at index 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
}

impl RequestHead {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self { method, uri }
    }
}

/// Per-request context for exception handling
///
/// Gives indexed access to the platform objects of the request being handled.
/// For HTTP, index 0 is the request and index 1 the raw outgoing response.
#[derive(Clone, Default)]
pub struct ArgumentsHost {
    args: Vec<Arc<HostArgument>>,
}

impl ArgumentsHost {
    pub fn new(args: Vec<Arc<HostArgument>>) -> Self {
        Self { args }
    }

    /// Host for an axum request: `[RequestHead, ResponseSlot]`.
    pub fn http(request: RequestHead, response: ResponseSlot) -> Self {
        let request: Arc<HostArgument> = Arc::new(request);
        let response: Arc<HostArgument> = Arc::new(response);
        Self::new(vec![request, response])
    }

    pub fn get_args(&self) -> &[Arc<HostArgument>] {
        &self.args
    }

    pub fn get_arg_by_index(&self, index: usize) -> Option<&HostArgument> {
        self.args.get(index).map(|arg| arg.as_ref())
    }

    /// Typed access to an argument; `None` when missing or of another type.
    pub fn get_arg<T: 'static>(&self, index: usize) -> Option<&T> {
        self.get_arg_by_index(index)?.downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_host_layout() {
        let slot = ResponseSlot::new();
        let head = RequestHead::new(Method::POST, Uri::from_static("/users"));
        let host = ArgumentsHost::http(head.clone(), slot);

        assert_eq!(host.get_args().len(), 2);
        assert_eq!(host.get_arg::<RequestHead>(0), Some(&head));
        assert!(host.get_arg::<ResponseSlot>(RESPONSE_ARG_INDEX).is_some());
        assert!(host.get_arg::<RequestHead>(RESPONSE_ARG_INDEX).is_none());
        assert!(host.get_arg_by_index(2).is_none());
    }
}
