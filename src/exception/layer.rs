use super::{Exception, ExceptionFilter, RequestHead, respond};
use axum::{body::Body, http::Request, response::Response};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

tokio::task_local! {
    /// Filter of the innermost [`ExceptionFilterLayer`] and the request it is handling.
    static ACTIVE_FILTER: FilterScope;
}

#[derive(Clone)]
pub(crate) struct FilterScope {
    pub(crate) filter: Arc<dyn ExceptionFilter>,
    pub(crate) request: RequestHead,
}

/// The filter installed by an enclosing [`ExceptionFilterLayer`], if any.
///
/// Exceptions turned into responses inside a layered service (handler return
/// values in a Router) are dispatched through it.
pub(crate) fn active_filter() -> Option<FilterScope> {
    ACTIVE_FILTER.try_with(FilterScope::clone).ok()
}

/// Tower Layer that sends exceptions raised under it through an [`ExceptionFilter`]
///
/// Covers both errors returned by the inner service and exceptions that
/// handlers return as responses. The wrapped service never fails: every error
/// becomes the response the filter wrote.
pub struct ExceptionFilterLayer<F> {
    filter: Arc<F>,
}

impl<F: ExceptionFilter> ExceptionFilterLayer<F> {
    pub fn new(filter: F) -> Self {
        Self::shared(Arc::new(filter))
    }

    pub fn shared(filter: Arc<F>) -> Self {
        Self { filter }
    }
}

impl<F> Clone for ExceptionFilterLayer<F> {
    fn clone(&self) -> Self {
        Self {
            filter: Arc::clone(&self.filter),
        }
    }
}

impl<S, F> Layer<S> for ExceptionFilterLayer<F> {
    type Service = ExceptionFilterMiddleware<S, F>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionFilterMiddleware {
            inner,
            filter: Arc::clone(&self.filter),
            ready_error: None,
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub struct ExceptionFilterMiddleware<S, F> {
    inner: S,
    filter: Arc<F>,
    ready_error: Option<BoxError>,
}

impl<S: Clone, F> Clone for ExceptionFilterMiddleware<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            filter: Arc::clone(&self.filter),
            ready_error: None,
        }
    }
}

impl<S, F> Service<Request<Body>> for ExceptionFilterMiddleware<S, F>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
    F: ExceptionFilter,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.inner.poll_ready(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            // Reported through the filter on the next call.
            Poll::Ready(Err(e)) => {
                self.ready_error = Some(e.into());
                Poll::Ready(Ok(()))
            }
        }
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let filter = Arc::clone(&self.filter);
        let head = RequestHead::new(request.method().clone(), request.uri().clone());
        if let Some(e) = self.ready_error.take() {
            let response = respond(filter.as_ref(), Exception::from_boxed(e), head);
            return Box::pin(async move { Ok(response) });
        }
        // Swap in a fresh clone so the instance that was polled ready is the one called.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let scope = FilterScope {
            filter: filter.clone(),
            request: head.clone(),
        };

        Box::pin(async move {
            match ACTIVE_FILTER.scope(scope, inner.call(request)).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    let exception = Exception::from_boxed(e.into());
                    tracing::debug!(
                        kind = %exception.kind(),
                        method = %head.method,
                        uri = %head.uri,
                        "Exception caught by filter"
                    );
                    Ok(respond(filter.as_ref(), exception, head))
                }
            }
        })
    }
}
