pub mod directory;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use malaeb_http::error::AppError;
use malaeb_kernel::{InitCtx, Module};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::modules::bookings::models::TimeSlot;
use crate::session::Session;
use crate::utils::{CUSTOMER_WINDOW_DAYS, OWNER_WINDOW_DAYS};
use models::{UserId, Venue, VenueId};

/// Venue catalogue and per-day slot boards
pub struct VenuesModule {
    session: Arc<Session>,
}

impl VenuesModule {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Module for VenuesModule {
    fn name(&self) -> &'static str {
        "venues"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            venues = self.session.venues().len(),
            "venues module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_venues))
            .route("/dates", get(bookable_dates))
            .route("/owned/{user_id}", get(owned_venues))
            .route("/{venue_id}", get(get_venue))
            .route("/{venue_id}/slots", get(venue_slots))
            .with_state(self.session.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List venues",
                        "tags": ["Venues"],
                        "responses": {
                            "200": {
                                "description": "All venues in catalogue order",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Venue" }
                                } } }
                            }
                        }
                    }
                },
                "/dates": {
                    "get": {
                        "summary": "Dates that can be offered for booking",
                        "tags": ["Venues"],
                        "parameters": [{
                            "name": "window", "in": "query", "required": false,
                            "schema": { "type": "string", "enum": ["customer", "owner"] }
                        }],
                        "responses": {
                            "200": {
                                "description": "Consecutive dates starting today",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "type": "string", "format": "date" }
                                } } }
                            }
                        }
                    }
                },
                "/owned/{user_id}": {
                    "get": {
                        "summary": "Venues owned by a user",
                        "tags": ["Venues"],
                        "parameters": [{
                            "name": "user_id", "in": "path", "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Owned venues, possibly empty",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Venue" }
                                } } }
                            }
                        }
                    }
                },
                "/{venue_id}": {
                    "get": {
                        "summary": "Get a venue",
                        "tags": ["Venues"],
                        "parameters": [{
                            "name": "venue_id", "in": "path", "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The venue",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/Venue"
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
                },
                "/{venue_id}/slots": {
                    "get": {
                        "summary": "Slot board for one day",
                        "tags": ["Venues"],
                        "parameters": [
                            {
                                "name": "venue_id", "in": "path", "required": true,
                                "schema": { "type": "integer" }
                            },
                            {
                                "name": "date", "in": "query", "required": false,
                                "description": "Defaults to today",
                                "schema": { "type": "string", "format": "date" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "One entry per template hour",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/SlotBoard"
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
                    "Venue": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "ownerId": { "type": "integer" },
                            "name": { "type": "string" },
                            "location": { "type": "string" },
                            "price": { "type": "string", "description": "Price of one hourly slot" },
                            "photos": { "type": "array", "items": { "type": "string" } }
                        },
                        "required": ["id", "ownerId", "name", "location", "price", "photos"]
                    },
                    "TimeSlot": {
                        "type": "object",
                        "properties": {
                            "time": { "type": "string", "example": "19:00" },
                            "isBooked": { "type": "boolean" },
                            "bookedBy": { "type": "integer" },
                            "userName": { "type": "string" }
                        },
                        "required": ["time", "isBooked"]
                    },
                    "SlotBoard": {
                        "type": "object",
                        "properties": {
                            "venueId": { "type": "integer" },
                            "date": { "type": "string", "format": "date" },
                            "slots": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/TimeSlot" }
                            }
                        },
                        "required": ["venueId", "date", "slots"]
                    }
                }
            }
        }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotBoard {
    venue_id: VenueId,
    date: NaiveDate,
    slots: Vec<TimeSlot>,
}

#[derive(Debug, Deserialize)]
struct SlotsQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Window {
    #[default]
    Customer,
    Owner,
}

#[derive(Debug, Deserialize)]
struct DatesQuery {
    #[serde(default)]
    window: Window,
}

async fn list_venues(State(session): State<Arc<Session>>) -> Json<Vec<Venue>> {
    Json(session.venues())
}

async fn get_venue(
    State(session): State<Arc<Session>>,
    Path(venue_id): Path<VenueId>,
) -> Result<Json<Venue>, AppError> {
    Ok(Json(session.venue(venue_id)?))
}

async fn owned_venues(
    State(session): State<Arc<Session>>,
    Path(user_id): Path<UserId>,
) -> Json<Vec<Venue>> {
    Json(session.venues_owned_by(user_id))
}

async fn venue_slots(
    State(session): State<Arc<Session>>,
    Path(venue_id): Path<VenueId>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotBoard>, AppError> {
    session.venue(venue_id)?;
    let date = query.date.unwrap_or_else(|| session.clock().today());

    Ok(Json(SlotBoard {
        venue_id,
        date,
        slots: session.resolve_slots(venue_id, date),
    }))
}

async fn bookable_dates(
    State(session): State<Arc<Session>>,
    Query(query): Query<DatesQuery>,
) -> Json<Vec<NaiveDate>> {
    let days = match query.window {
        Window::Customer => CUSTOMER_WINDOW_DAYS,
        Window::Owner => OWNER_WINDOW_DAYS,
    };
    Json(session.bookable_dates(days))
}

/// Create the venues module over a shared session
pub fn create_module(session: Arc<Session>) -> Arc<dyn Module> {
    Arc::new(VenuesModule::new(session))
}
