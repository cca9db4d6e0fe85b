//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use jobboard_router::http::{HttpError, Request, Response};
use jobboard_router::middleware::{Flow, Middleware};
use jobboard_router::routing::{Controller, HandlerError, HandlerTarget};

/// Ordered record of what ran during dispatch.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Controller that records which handler ran and echoes its label.
pub struct Labelled {
    pub label: &'static str,
    pub trace: Trace,
}

impl Controller for Labelled {
    fn name(&self) -> &'static str {
        "Labelled"
    }

    fn invoke(
        &self,
        operation: &str,
        req: &mut Request,
        res: &mut Response,
    ) -> Result<(), HandlerError> {
        match operation {
            "handle" => {
                self.trace
                    .push(format!("handler:{}:{}", self.label, req.pattern()));
                res.text(StatusCode::OK, self.label);
                Ok(())
            }
            other => Err(HandlerError::UnknownOperation(other.to_string())),
        }
    }
}

/// Handler factory for a [`Labelled`] controller.
pub fn handler(label: &'static str, trace: &Trace) -> impl Fn() -> HandlerTarget + Send + Sync + 'static {
    let trace = trace.clone();
    move || {
        HandlerTarget::new(
            Labelled {
                label,
                trace: trace.clone(),
            },
            "handle",
        )
    }
}

/// Middleware that records itself and optionally halts with 401.
pub struct Mark {
    pub name: &'static str,
    pub halt: bool,
    pub trace: Trace,
}

impl Middleware for Mark {
    fn handle(&self, _req: &mut Request, res: &mut Response) -> Result<Flow, HttpError> {
        self.trace.push(format!("middleware:{}", self.name));
        if self.halt {
            res.error(&HttpError::unauthorized("Unauthorized"));
            return Ok(Flow::Halt);
        }
        Ok(Flow::Continue)
    }
}

pub fn mark(name: &'static str, halt: bool, trace: &Trace) -> Box<dyn Middleware> {
    Box::new(Mark {
        name,
        halt,
        trace: trace.clone(),
    })
}
