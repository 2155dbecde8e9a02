/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;

use pseo_server::{SiteParts, SiteServer};
use tower_http::trace::TraceLayer;

/// Re-export pseo-server core for convenience
pub use pseo_server;

/// Extension trait that converts a `SiteServer` into an Axum router.
pub trait IntoAxumRouter {
  fn into_axum_router(self) -> axum::Router;
  fn serve(
    self,
    addr: &str,
  ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send;
}

impl IntoAxumRouter for SiteParts {
  fn into_axum_router(self) -> axum::Router {
    handler::build_router(self).layer(TraceLayer::new_for_http())
  }

  async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.into_axum_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("pseo server running on http://localhost:{}", local_addr.port());
    axum::serve(listener, router).await?;
    Ok(())
  }
}

impl IntoAxumRouter for SiteServer {
  fn into_axum_router(self) -> axum::Router {
    self.into_parts().into_axum_router()
  }

  async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    self.into_parts().serve(addr).await
  }
}
