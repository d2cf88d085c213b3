//! Application state
//!
//! Holds the service context, the bearer token validator and, when the
//! server runs against real backends, the pools probed by readiness.

use std::sync::Arc;

use feed_cache::RedisPool;
use feed_common::JwtService;
use feed_db::PgPool;
use feed_service::{FeedFacade, ServiceContext};

/// Connection pools checked by `/health/ready`
#[derive(Clone)]
pub struct Backends {
    pub database: PgPool,
    pub redis: RedisPool,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    jwt_service: Arc<JwtService>,
    backends: Option<Backends>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, jwt_service: JwtService) -> Self {
        Self {
            service_context: Arc::new(service_context),
            jwt_service: Arc::new(jwt_service),
            backends: None,
        }
    }

    /// Attach the pools behind the service context
    pub fn with_backends(mut self, database: PgPool, redis: RedisPool) -> Self {
        self.backends = Some(Backends { database, redis });
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Feed operations for one request
    pub fn feed(&self) -> FeedFacade<'_> {
        FeedFacade::new(&self.service_context)
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// `None` when the feed runs on in-process stores
    pub fn backends(&self) -> Option<&Backends> {
        self.backends.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("jwt_service", &self.jwt_service)
            .field("has_backends", &self.backends.is_some())
            .finish()
    }
}
