//! Handler targets: the `(controller, operation)` pair a route resolves to.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::http::{HttpError, Request, Response};

/// Errors a controller reports back to the dispatcher.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Business failure carrying the status to answer with.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The controller has no operation with this name.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
}

/// An object exposing named operations over `(request, response)`.
pub trait Controller {
    /// Name used in logs and configuration errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Run `operation`, writing the outcome into `res`.
    fn invoke(
        &self,
        operation: &str,
        req: &mut Request,
        res: &mut Response,
    ) -> Result<(), HandlerError>;
}

/// The code a matched route hands the request to.
pub struct HandlerTarget {
    controller: Box<dyn Controller>,
    operation: Cow<'static, str>,
}

impl HandlerTarget {
    pub fn new(
        controller: impl Controller + 'static,
        operation: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            controller: Box::new(controller),
            operation: operation.into(),
        }
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller.name()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub(crate) fn invoke(&self, req: &mut Request, res: &mut Response) -> Result<(), HandlerError> {
        self.controller.invoke(&self.operation, req, res)
    }
}

impl fmt::Debug for HandlerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTarget")
            .field("controller", &self.controller_name())
            .field("operation", &self.operation)
            .finish()
    }
}
