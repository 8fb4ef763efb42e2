//! Tower and Axum integration: a [`Router`] as a `Service`, mounted on an
//! `axum::Router`, or served on a TCP listener.

use {
    super::Router,
    crate::{Error, Result},
    axum::{body::Body, response::Response},
    http::Request,
    std::{
        convert::Infallible,
        future::Future,
        pin::Pin,
        sync::Arc,
        task::{Context, Poll},
    },
    tokio::{net::TcpListener, signal},
    tower::Service,
};

/// A cheaply cloneable `tower::Service` that dispatches through a shared
/// [`Router`]. It never fails: unmatched requests get the not-found handler.
#[derive(Debug, Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<Response<Body>, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let response = self.router.dispatch(req);
        Box::pin(async move { Ok(response.await) })
    }
}

impl Router {
    pub fn into_service(self) -> RouterService {
        RouterService {
            router: Arc::new(self),
        }
    }

    /// An `axum::Router` that sends every request to this router, so that
    /// Axum layers and `axum::serve` can be used around it.
    pub fn into_axum(self) -> axum::Router {
        axum::Router::new().fallback_service(self.into_service())
    }

    /// Serves requests on `listener` until Ctrl+C or SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serves requests on `listener` until `shutdown` completes, then waits
    /// for in-flight requests to finish.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener.local_addr()?;
        tracing::info!(address = %address, "Waiting for connections");

        axum::serve(listener, self.into_axum())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(Error::from_io)?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::debug!("Ctrl+C signal received"),
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
