pub mod ledger;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use malaeb_http::error::AppError;
use malaeb_kernel::{InitCtx, Module};
use serde::Deserialize;
use serde_json::json;

use crate::modules::venues::models::VenueId;
use crate::session::Session;
use models::{InvoiceDraft, InvoiceStatus, MaintenanceInvoice};

/// Per-venue maintenance expense ledger
pub struct MaintenanceModule {
    session: Arc<Session>,
}

impl MaintenanceModule {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Module for MaintenanceModule {
    fn name(&self) -> &'static str {
        "maintenance"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            invoices = self.session.invoice_count(),
            "maintenance module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/{venue_id}", get(list_invoices).post(add_invoice))
            .with_state(self.session.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{venue_id}": {
                    "get": {
                        "summary": "Maintenance invoices for a venue",
                        "tags": ["Maintenance"],
                        "parameters": [{
                            "name": "venue_id", "in": "path", "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Invoices, newest first",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/MaintenanceInvoice" }
                                } } }
                            },
                            "404": {
                                "description": "Unknown venue",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/ErrorResponse"
                                } } }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a maintenance invoice",
                        "tags": ["Maintenance"],
                        "parameters": [{
                            "name": "venue_id", "in": "path", "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": {
                                "$ref": "#/components/schemas/InvoiceForm"
                            } } }
                        },
                        "responses": {
                            "201": {
                                "description": "Invoice recorded",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/MaintenanceInvoice"
                                } } }
                            },
                            "404": {
                                "description": "Unknown venue",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/ErrorResponse"
                                } } }
                            },
                            "422": {
                                "description": "Empty description or invalid amount",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/ErrorResponse"
                                } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "MaintenanceInvoice": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "venueId": { "type": "integer" },
                            "date": { "type": "string", "format": "date" },
                            "description": { "type": "string" },
                            "amount": { "type": "string" },
                            "status": { "type": "string", "enum": ["Paid", "Pending"] }
                        },
                        "required": ["id", "venueId", "date", "description", "amount", "status"]
                    },
                    "InvoiceForm": {
                        "type": "object",
                        "properties": {
                            "date": { "type": "string", "format": "date", "description": "Defaults to today" },
                            "description": { "type": "string" },
                            "amount": { "oneOf": [{ "type": "string" }, { "type": "number" }] },
                            "status": { "type": "string", "enum": ["Paid", "Pending"], "default": "Pending" }
                        },
                        "required": ["description", "amount"]
                    }
                }
            }
        }))
    }
}

/// Amount as a form would send it: typed text or a JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    fn into_text(self) -> String {
        match self {
            RawAmount::Text(text) => text,
            RawAmount::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InvoiceForm {
    date: Option<NaiveDate>,
    description: String,
    amount: RawAmount,
    #[serde(default)]
    status: InvoiceStatus,
}

async fn list_invoices(
    State(session): State<Arc<Session>>,
    Path(venue_id): Path<VenueId>,
) -> Result<Json<Vec<MaintenanceInvoice>>, AppError> {
    session.venue(venue_id)?;
    Ok(Json(session.invoices(venue_id)))
}

async fn add_invoice(
    State(session): State<Arc<Session>>,
    Path(venue_id): Path<VenueId>,
    Json(form): Json<InvoiceForm>,
) -> Result<(StatusCode, Json<MaintenanceInvoice>), AppError> {
    let draft = InvoiceDraft {
        venue_id,
        date: form.date.unwrap_or_else(|| session.clock().today()),
        description: form.description,
        amount: form.amount.into_text(),
        status: form.status,
    };
    let invoice = session.add_invoice(draft)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Create the maintenance module over a shared session
pub fn create_module(session: Arc<Session>) -> Arc<dyn Module> {
    Arc::new(MaintenanceModule::new(session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{self, call};
    use axum::http::Method;

    #[tokio::test]
    async fn seeded_invoices_listed() {
        let (session, _) = testing::session();
        let router = MaintenanceModule::new(session).routes();

        let (status, body) = call(router.clone(), Method::GET, "/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|invoice| invoice["id"].clone())
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);

        let (_, body) = call(router, Method::GET, "/2", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_invoice_goes_first() {
        let (session, _) = testing::session();
        let router = MaintenanceModule::new(session.clone()).routes();

        let (status, body) = call(
            router.clone(),
            Method::POST,
            "/1",
            Some(json!({"description": "New goal nets", "amount": 40.5})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "m_100");
        assert_eq!(body["amount"], "40.5");
        assert_eq!(body["status"], "Pending");
        assert_eq!(body["date"], "2024-09-01");
        assert_eq!(session.notification().unwrap().message, "Invoice added successfully.");

        let (_, body) = call(router, Method::GET, "/1", None).await;
        assert_eq!(body[0]["id"], "m_100");
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_invoice_is_rejected() {
        let (session, _) = testing::session();
        let router = MaintenanceModule::new(session.clone()).routes();

        let (status, body) = call(
            router.clone(),
            Method::POST,
            "/1",
            Some(json!({"description": "   ", "amount": "10"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["details"][0]["field"], "description");

        let (status, body) = call(
            router,
            Method::POST,
            "/1",
            Some(json!({"description": "Paint", "amount": "-3", "status": "Paid"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["details"][0]["field"], "amount");
        assert_eq!(session.invoice_count(), 2);
    }
}
