//! Controllers for the job-application API.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::app::model::{Application, ApplicationStatus, PaginationMeta};
use crate::app::store::ApplicationStore;
use crate::http::{HttpError, Request, Response};
use crate::middleware::UserContext;
use crate::routing::{Controller, HandlerError};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Serialize)]
struct Page<'a> {
    data: &'a [Application],
    meta: PaginationMeta,
}

#[derive(Deserialize)]
struct StatusUpdate {
    status: ApplicationStatus,
    #[serde(default)]
    status_reason: Option<String>,
}

/// Company-facing review of job applications.
///
/// Operations: `index`, `show`, `update_status`.
pub struct ApplicationController {
    store: Arc<dyn ApplicationStore>,
}

impl ApplicationController {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }

    /// `GET /jobs/{job_id}/applications?page&limit`
    fn index(&self, req: &mut Request, res: &mut Response) -> Result<(), HttpError> {
        let user = current_user(req)?;
        let job_id: i64 = req.param_as("job_id")?;
        let page: u32 = req.query_as("page", 1)?;
        let limit: u32 = req.query_as("limit", DEFAULT_PAGE_SIZE)?;
        if page == 0 || limit == 0 {
            return Err(HttpError::bad_request("page and limit must be positive"));
        }
        let limit = limit.min(MAX_PAGE_SIZE);

        let job = self
            .store
            .job(job_id)
            .ok_or_else(|| HttpError::not_found("Job not found"))?;
        if job.company_id != user.user_id {
            return Err(HttpError::forbidden("Job belongs to another company"));
        }

        let (data, meta) = self.store.job_applications(job_id, page, limit);
        res.json(StatusCode::OK, &Page { data: &data, meta })
    }

    /// `GET /applications/{application_id}`
    fn show(&self, req: &mut Request, res: &mut Response) -> Result<(), HttpError> {
        let user = current_user(req)?;
        let application = self.owned_application(req, &user)?;
        res.json(StatusCode::OK, &application)
    }

    /// `PUT /applications/{application_id}/status`
    fn update_status(&self, req: &mut Request, res: &mut Response) -> Result<(), HttpError> {
        let user = current_user(req)?;
        let update: StatusUpdate = req.json()?;
        if update.status == ApplicationStatus::Waiting {
            return Err(HttpError::bad_request(
                "status must be `accepted` or `rejected`",
            ));
        }

        let mut application = self.owned_application(req, &user)?;
        application.status = update.status;
        application.status_reason = update
            .status_reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());
        self.store.update_application_status(&application);

        res.json(StatusCode::OK, &application)
    }

    fn owned_application(
        &self,
        req: &Request,
        user: &UserContext,
    ) -> Result<Application, HttpError> {
        let application_id: i64 = req.param_as("application_id")?;
        let application = self
            .store
            .application(application_id)
            .ok_or_else(|| HttpError::not_found("Application not found"))?;

        let owner = application.job.as_ref().map(|job| job.company_id);
        if owner != Some(user.user_id) {
            return Err(HttpError::forbidden(
                "Application belongs to another company",
            ));
        }
        Ok(application)
    }
}

impl Controller for ApplicationController {
    fn name(&self) -> &'static str {
        "ApplicationController"
    }

    fn invoke(
        &self,
        operation: &str,
        req: &mut Request,
        res: &mut Response,
    ) -> Result<(), HandlerError> {
        match operation {
            "index" => self.index(req, res)?,
            "show" => self.show(req, res)?,
            "update_status" => self.update_status(req, res)?,
            other => return Err(HandlerError::UnknownOperation(other.to_string())),
        }
        Ok(())
    }
}

/// Liveness endpoint.
pub struct HealthController;

impl Controller for HealthController {
    fn name(&self) -> &'static str {
        "HealthController"
    }

    fn invoke(
        &self,
        operation: &str,
        _req: &mut Request,
        res: &mut Response,
    ) -> Result<(), HandlerError> {
        match operation {
            "status" => {
                res.json(
                    StatusCode::OK,
                    &serde_json::json!({
                        "status": "ok",
                        "version": env!("CARGO_PKG_VERSION"),
                    }),
                )?;
                Ok(())
            }
            other => Err(HandlerError::UnknownOperation(other.to_string())),
        }
    }
}

fn current_user(req: &Request) -> Result<UserContext, HttpError> {
    req.extensions()
        .get::<UserContext>()
        .copied()
        .ok_or_else(|| HttpError::unauthorized("Authentication required"))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;

    use super::*;
    use crate::app::model::UserRole;
    use crate::app::store::MemoryStore;
    use crate::http::Incoming;
    use crate::routing::PathParams;

    const ACME: UserContext = UserContext {
        user_id: 1,
        role: UserRole::Company,
    };
    const GLOBEX: UserContext = UserContext {
        user_id: 4,
        role: UserRole::Company,
    };

    fn controller() -> (ApplicationController, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::seeded());
        (ApplicationController::new(store.clone()), store)
    }

    fn request(
        incoming: Incoming,
        pattern: &str,
        params: &[(&str, &str)],
        user: Option<UserContext>,
    ) -> Request {
        let params: PathParams = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut req = Request::new(incoming, pattern, params);
        if let Some(user) = user {
            req.extensions_mut().insert(user);
        }
        req
    }

    fn call(
        controller: &ApplicationController,
        operation: &str,
        req: &mut Request,
    ) -> Result<Response, HandlerError> {
        let mut res = Response::new();
        controller.invoke(operation, req, &mut res)?;
        Ok(res)
    }

    fn http_status(result: Result<Response, HandlerError>) -> StatusCode {
        match result {
            Ok(res) => res.status(),
            Err(HandlerError::Http(err)) => err.status(),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_index_lists_own_job() {
        let (controller, _) = controller();
        let mut req = request(
            Incoming::new(Method::GET, "/jobs/1/applications").with_query("limit", "1"),
            "/jobs/{job_id}/applications",
            &[("job_id", "1")],
            Some(ACME),
        );
        let res = call(&controller, "index", &mut req).unwrap();
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();

        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["application_id"], 2);
        assert_eq!(body["meta"]["total_items"], 2);
        assert_eq!(body["meta"]["total_pages"], 2);
    }

    #[test]
    fn test_index_rejects_other_company_and_missing_job() {
        let (controller, _) = controller();
        let mut req = request(
            Incoming::new(Method::GET, "/jobs/1/applications"),
            "/jobs/{job_id}/applications",
            &[("job_id", "1")],
            Some(GLOBEX),
        );
        assert_eq!(http_status(call(&controller, "index", &mut req)), StatusCode::FORBIDDEN);

        let mut req = request(
            Incoming::new(Method::GET, "/jobs/9/applications"),
            "/jobs/{job_id}/applications",
            &[("job_id", "9")],
            Some(ACME),
        );
        assert_eq!(http_status(call(&controller, "index", &mut req)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_index_validates_paging() {
        let (controller, _) = controller();
        let mut req = request(
            Incoming::new(Method::GET, "/jobs/1/applications").with_query("page", "0"),
            "/jobs/{job_id}/applications",
            &[("job_id", "1")],
            Some(ACME),
        );
        assert_eq!(http_status(call(&controller, "index", &mut req)), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_show_requires_context() {
        let (controller, _) = controller();
        let mut req = request(
            Incoming::new(Method::GET, "/applications/1"),
            "/applications/{application_id}",
            &[("application_id", "1")],
            None,
        );
        assert_eq!(http_status(call(&controller, "show", &mut req)), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_show_attaches_user_and_job() {
        let (controller, _) = controller();
        let mut req = request(
            Incoming::new(Method::GET, "/applications/3"),
            "/applications/{application_id}",
            &[("application_id", "3")],
            Some(ACME),
        );
        let res = call(&controller, "show", &mut req).unwrap();
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["user"]["name"], "Alice");
        assert_eq!(body["job"]["position"], "Data Analyst");
    }

    #[test]
    fn test_update_status_writes_through() {
        let (controller, store) = controller();
        let mut req = request(
            Incoming::new(Method::PUT, "/applications/1/status")
                .with_body(r#"{"status":"rejected","status_reason":"  Position filled "}"#),
            "/applications/{application_id}/status",
            &[("application_id", "1")],
            Some(ACME),
        );
        let res = call(&controller, "update_status", &mut req).unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let stored = store.application(1).unwrap();
        assert_eq!(stored.status, ApplicationStatus::Rejected);
        assert_eq!(stored.status_reason.as_deref(), Some("Position filled"));
    }

    #[test]
    fn test_update_status_rejects_waiting_and_bad_body() {
        let (controller, store) = controller();
        for body in [r#"{"status":"waiting"}"#, r#"{"status":"maybe"}"#, "not json"] {
            let mut req = request(
                Incoming::new(Method::PUT, "/applications/1/status").with_body(body),
                "/applications/{application_id}/status",
                &[("application_id", "1")],
                Some(ACME),
            );
            assert_eq!(
                http_status(call(&controller, "update_status", &mut req)),
                StatusCode::BAD_REQUEST,
                "body {body}"
            );
        }
        assert_eq!(store.application(1).unwrap().status, ApplicationStatus::Waiting);
    }

    #[test]
    fn test_unknown_operation() {
        let (controller, _) = controller();
        let mut req = request(Incoming::new(Method::GET, "/"), "/", &[], Some(ACME));
        assert!(matches!(
            call(&controller, "destroy", &mut req),
            Err(HandlerError::UnknownOperation(op)) if op == "destroy"
        ));
    }
}
