pub mod aggregator;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use malaeb_http::error::AppError;
use malaeb_kernel::{InitCtx, Module};
use serde::Deserialize;
use serde_json::json;

use crate::modules::venues::models::VenueId;
use crate::session::{FinancialReport, Session};
use crate::utils::Language;

/// Owner-facing revenue report per venue
pub struct FinanceModule {
    session: Arc<Session>,
}

impl FinanceModule {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Module for FinanceModule {
    fn name(&self) -> &'static str {
        "finance"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            language = ?self.session.default_language(),
            "finance module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/{venue_id}", get(financial_report))
            .with_state(self.session.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{venue_id}": {
                    "get": {
                        "summary": "Revenue report for a venue",
                        "tags": ["Finance"],
                        "parameters": [
                            {
                                "name": "venue_id", "in": "path", "required": true,
                                "schema": { "type": "integer" }
                            },
                            {
                                "name": "lang", "in": "query", "required": false,
                                "description": "Month label language",
                                "schema": { "type": "string", "enum": ["en", "ar"] }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Total, monthly breakdown and bookings log",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/FinancialReport"
                                } } }
                            },
                            "404": {
                                "description": "Unknown venue",
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
                    "MonthlyRevenue": {
                        "type": "object",
                        "properties": {
                            "period": { "type": "string", "example": "September 2024" },
                            "year": { "type": "integer" },
                            "month": { "type": "integer" },
                            "amount": { "type": "string" }
                        },
                        "required": ["period", "year", "month", "amount"]
                    },
                    "LogEntry": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "venueId": { "type": "integer" },
                            "userId": { "type": "integer" },
                            "date": { "type": "string", "format": "date" },
                            "time": { "type": "string" },
                            "amount": { "type": "string" }
                        },
                        "required": ["id", "venueId", "userId", "date", "time", "amount"]
                    },
                    "FinancialReport": {
                        "type": "object",
                        "properties": {
                            "venue": { "$ref": "#/components/schemas/Venue" },
                            "totalRevenue": { "type": "string" },
                            "monthlyRevenue": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/MonthlyRevenue" }
                            },
                            "bookingsLog": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/LogEntry" }
                            }
                        },
                        "required": ["venue", "totalRevenue", "monthlyRevenue", "bookingsLog"]
                    }
                }
            }
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    lang: Option<Language>,
}

async fn financial_report(
    State(session): State<Arc<Session>>,
    Path(venue_id): Path<VenueId>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<FinancialReport>, AppError> {
    let language = query.lang.unwrap_or(session.default_language());
    Ok(Json(session.financial_report(venue_id, language)?))
}

/// Create the finance module over a shared session
pub fn create_module(session: Arc<Session>) -> Arc<dyn Module> {
    Arc::new(FinanceModule::new(session))
}
