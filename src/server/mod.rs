mod rejection;
mod routes;

pub use rejection::handle_rejection;

use std::net::SocketAddr;
use std::sync::Arc;

use warp::Filter;

use crate::config::ServeConfig;
use crate::server::routes::create_routes;
use crate::upstream;

pub struct RelayServer {
    pub client: reqwest::Client,
    pub config: ServeConfig,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl RelayServer {
    pub fn new(config: ServeConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let client = upstream::build_client()?;

        Ok(Self {
            client,
            config,
            started_at: chrono::Utc::now(),
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr: SocketAddr = self.config.listen.parse()?;
        let server = Arc::new(self);

        let routes = create_routes(server.clone()).recover(handle_rejection);

        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec![
                "Content-Type",
                "Authorization",
                "Accept",
                "Origin",
                "X-Requested-With",
            ])
            .allow_methods(vec!["GET", "POST", "OPTIONS"]);

        let routes_with_cors = routes.with(cors);

        log::info!("starting relay server on {}", addr);
        log::info!("upstream completion API: {}", server.config.upstream_url);
        log::info!("model: {}", server.config.model);

        warp::serve(routes_with_cors).run(addr).await;

        Ok(())
    }
}
