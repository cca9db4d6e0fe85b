//! Job-application API.
//!
//! # Routes
//! ```text
//! GET  /health                                 HealthController::status
//! GET  /jobs/{job_id}/applications             ApplicationController::index          auth + company
//! GET  /applications/{application_id}          ApplicationController::show           auth + company
//! PUT  /applications/{application_id}/status   ApplicationController::update_status  auth + company
//! ```

pub mod controllers;
pub mod model;
pub mod store;

use std::sync::Arc;

use crate::app::controllers::{ApplicationController, HealthController};
use crate::app::model::UserRole;
use crate::app::store::ApplicationStore;
use crate::middleware::{
    AuthMiddleware, Middleware, RequestLogMiddleware, RoleMiddleware, TokenRegistry,
};
use crate::routing::{HandlerTarget, Router};

/// Register every API route on `router`.
pub fn register_routes(
    router: &mut Router,
    store: Arc<dyn ApplicationStore>,
    tokens: Arc<TokenRegistry>,
) {
    router
        .get("/health", || HandlerTarget::new(HealthController, "status"))
        .with_middleware(|| vec![Box::new(RequestLogMiddleware) as Box<dyn Middleware>]);

    let company_only = move || -> Vec<Box<dyn Middleware>> {
        vec![
            Box::new(RequestLogMiddleware),
            Box::new(AuthMiddleware::new(tokens.clone())),
            Box::new(RoleMiddleware::new(UserRole::Company)),
        ]
    };
    let applications = move |operation: &'static str| {
        let store = store.clone();
        move || HandlerTarget::new(ApplicationController::new(store.clone()), operation)
    };

    router
        .get("/jobs/{job_id}/applications", applications("index"))
        .with_middleware(company_only.clone());
    router
        .get("/applications/{application_id}", applications("show"))
        .with_middleware(company_only.clone());
    router
        .put(
            "/applications/{application_id}/status",
            applications("update_status"),
        )
        .with_middleware(company_only);
}
