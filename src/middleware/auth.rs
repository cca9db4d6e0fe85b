//! Authentication and role middleware.
//! Resolves bearer tokens and enforces account roles.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::app::model::UserRole;
use crate::config::AuthConfig;
use crate::http::{HttpError, Request, Response};
use crate::middleware::{Flow, Middleware};

/// Context attached to authenticated requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: i64,
    pub role: UserRole,
}

/// Accepted tokens and the identities behind them.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, UserContext>,
}

impl TokenRegistry {
    pub fn from_config(config: &AuthConfig) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|t| {
                (
                    t.token.clone(),
                    UserContext {
                        user_id: t.user_id,
                        role: t.role,
                    },
                )
            })
            .collect();
        Self { tokens }
    }

    pub fn insert(&mut self, token: impl Into<String>, context: UserContext) {
        self.tokens.insert(token.into(), context);
    }

    pub fn resolve(&self, token: &str) -> Option<UserContext> {
        self.tokens.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Requires `Authorization: Bearer <token>` naming a known token.
/// On success attaches a [`UserContext`]; otherwise answers 401 and halts.
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    registry: Arc<TokenRegistry>,
}

impl AuthMiddleware {
    pub fn new(registry: Arc<TokenRegistry>) -> Self {
        Self { registry }
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, req: &mut Request, res: &mut Response) -> Result<Flow, HttpError> {
        let token = match req
            .header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
        {
            Some(token) => token.trim(),
            None => {
                res.error(&HttpError::unauthorized("Missing bearer token"));
                return Ok(Flow::Halt);
            }
        };

        match self.registry.resolve(token) {
            Some(ctx) => {
                req.extensions_mut().insert(ctx);
                Ok(Flow::Continue)
            }
            None => {
                warn!(request_id = %req.request_id(), path = %req.path(), "Rejected unknown token");
                res.error(&HttpError::unauthorized("Invalid bearer token"));
                Ok(Flow::Halt)
            }
        }
    }
}

/// Lets through only users with `role`. Must run after [`AuthMiddleware`].
#[derive(Debug, Clone, Copy)]
pub struct RoleMiddleware {
    role: UserRole,
}

impl RoleMiddleware {
    pub fn new(role: UserRole) -> Self {
        Self { role }
    }
}

impl Middleware for RoleMiddleware {
    fn handle(&self, req: &mut Request, res: &mut Response) -> Result<Flow, HttpError> {
        match req.extensions().get::<UserContext>() {
            Some(ctx) if ctx.role == self.role => Ok(Flow::Continue),
            Some(_) => {
                res.error(&HttpError::forbidden(format!(
                    "Only {} accounts may access this resource",
                    self.role
                )));
                Ok(Flow::Halt)
            }
            None => {
                res.error(&HttpError::unauthorized("Authentication required"));
                Ok(Flow::Halt)
            }
        }
    }
}
