use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use malaeb_events::Notification;
use malaeb_kernel::{InitCtx, Module};
use serde_json::json;

use crate::session::Session;

/// Exposes the session's current notification
pub struct NotificationsModule {
    session: Arc<Session>,
}

impl NotificationsModule {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Module for NotificationsModule {
    fn name(&self) -> &'static str {
        "notifications"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            ttl_ms = ctx.settings.session.notification_ttl_ms,
            "notifications module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(current_notification))
            .route("/{id}", delete(dismiss_notification))
            .with_state(self.session.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Notification currently on display",
                        "tags": ["Notifications"],
                        "responses": {
                            "200": {
                                "description": "The live notification",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/Notification"
                                } } }
                            },
                            "204": { "description": "Nothing to show" }
                        }
                    }
                },
                "/{id}": {
                    "delete": {
                        "summary": "Dismiss a notification",
                        "tags": ["Notifications"],
                        "parameters": [{
                            "name": "id", "in": "path", "required": true,
                            "schema": { "type": "integer", "format": "int64" }
                        }],
                        "responses": {
                            "204": { "description": "Dismissed" },
                            "404": { "description": "Not the current notification" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Notification": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "message": { "type": "string" },
                            "kind": { "type": "string", "enum": ["success", "error"] }
                        },
                        "required": ["id", "message", "kind"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(pending) = self.session.notification() {
            tracing::debug!(id = pending.id, "dropping live notification on shutdown");
        }
        Ok(())
    }
}

async fn current_notification(
    State(session): State<Arc<Session>>,
) -> Result<Json<Notification>, StatusCode> {
    session.notification().map(Json).ok_or(StatusCode::NO_CONTENT)
}

async fn dismiss_notification(
    State(session): State<Arc<Session>>,
    Path(id): Path<i64>,
) -> StatusCode {
    if session.dismiss_notification(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Create the notifications module over a shared session
pub fn create_module(session: Arc<Session>) -> Arc<dyn Module> {
    Arc::new(NotificationsModule::new(session))
}
