pub mod models;
pub mod resolver;
pub mod store;
pub mod template;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use malaeb_http::error::AppError;
use malaeb_kernel::{InitCtx, Module};
use serde::Deserialize;
use serde_json::json;

use crate::modules::venues::models::{UserId, VenueId};
use crate::session::Session;
use models::{Booking, BookingFilter, BookingId, NewBooking, UserBookings};

/// Booking creation, owner blocks, cancellation and queries
pub struct BookingsModule {
    session: Arc<Session>,
}

impl BookingsModule {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Module for BookingsModule {
    fn name(&self) -> &'static str {
        "bookings"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            bookings = self.session.booking_count(),
            slots_per_day = template::TIME_SLOTS.len(),
            "bookings module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(create_booking).get(list_bookings))
            .route("/block", post(block_slot))
            .route("/users/{user_id}", get(user_bookings))
            .route("/{booking_id}", delete(cancel_booking))
            .with_state(self.session.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = json!({
            "content": { "application/json": { "schema": {
                "$ref": "#/components/schemas/ErrorResponse"
            } } }
        });
        let booking_response = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": {
                    "$ref": "#/components/schemas/Booking"
                } } }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Book a slot",
                        "tags": ["Bookings"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": {
                                "$ref": "#/components/schemas/NewBooking"
                            } } }
                        },
                        "responses": {
                            "201": booking_response("Booking recorded"),
                            "404": error_response.clone(),
                            "422": error_response.clone()
                        }
                    },
                    "get": {
                        "summary": "Query bookings",
                        "tags": ["Bookings"],
                        "parameters": [
                            { "name": "venue_id", "in": "query", "schema": { "type": "integer" } },
                            { "name": "user_id", "in": "query", "schema": { "type": "integer" } },
                            { "name": "date", "in": "query", "schema": { "type": "string", "format": "date" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching bookings in insertion order",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Booking" }
                                } } }
                            }
                        }
                    }
                },
                "/block": {
                    "post": {
                        "summary": "Take a slot off sale",
                        "tags": ["Bookings"],
                        "requestBody": {
                            "required": true,
                            "content": { "application/json": { "schema": {
                                "$ref": "#/components/schemas/BlockSlot"
                            } } }
                        },
                        "responses": {
                            "201": booking_response("Slot blocked"),
                            "404": error_response.clone(),
                            "422": error_response
                        }
                    }
                },
                "/users/{user_id}": {
                    "get": {
                        "summary": "A user's upcoming and past bookings",
                        "tags": ["Bookings"],
                        "parameters": [{
                            "name": "user_id", "in": "path", "required": true,
                            "schema": { "type": "integer" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Upcoming soonest first, past most recent first",
                                "content": { "application/json": { "schema": {
                                    "$ref": "#/components/schemas/UserBookings"
                                } } }
                            }
                        }
                    }
                },
                "/{booking_id}": {
                    "delete": {
                        "summary": "Cancel a booking",
                        "description": "Unknown ids are accepted and change nothing.",
                        "tags": ["Bookings"],
                        "parameters": [{
                            "name": "booking_id", "in": "path", "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "204": { "description": "Booking no longer present" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Booking": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "venueId": { "type": "integer" },
                            "userId": { "type": "integer" },
                            "date": { "type": "string", "format": "date" },
                            "time": { "type": "string", "example": "19:00" }
                        },
                        "required": ["id", "venueId", "userId", "date", "time"]
                    },
                    "NewBooking": {
                        "type": "object",
                        "properties": {
                            "venueId": { "type": "integer" },
                            "userId": { "type": "integer" },
                            "date": { "type": "string", "format": "date" },
                            "time": { "type": "string", "example": "19:00" }
                        },
                        "required": ["venueId", "userId", "date", "time"]
                    },
                    "BlockSlot": {
                        "type": "object",
                        "properties": {
                            "venueId": { "type": "integer" },
                            "date": { "type": "string", "format": "date" },
                            "time": { "type": "string", "example": "08:00" }
                        },
                        "required": ["venueId", "date", "time"]
                    },
                    "UserBookings": {
                        "type": "object",
                        "properties": {
                            "upcoming": { "type": "array", "items": { "$ref": "#/components/schemas/Booking" } },
                            "past": { "type": "array", "items": { "$ref": "#/components/schemas/Booking" } }
                        },
                        "required": ["upcoming", "past"]
                    }
                }
            }
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockSlot {
    venue_id: VenueId,
    date: NaiveDate,
    time: String,
}

#[derive(Debug, Default, Deserialize)]
struct BookingsQuery {
    venue_id: Option<VenueId>,
    user_id: Option<UserId>,
    date: Option<NaiveDate>,
}

impl BookingsQuery {
    /// Narrowest store filter for the query; remaining conditions are applied by `accepts`.
    fn filter(&self) -> BookingFilter {
        match (self.venue_id, self.date, self.user_id) {
            (Some(venue), Some(date), _) => BookingFilter::VenueOnDate(venue, date),
            (Some(venue), None, _) => BookingFilter::Venue(venue),
            (None, _, Some(user)) => BookingFilter::User(user),
            (None, _, None) => BookingFilter::All,
        }
    }

    fn accepts(&self, booking: &Booking) -> bool {
        self.user_id.map_or(true, |user| booking.user_id == user)
            && self.date.map_or(true, |date| booking.date == date)
    }
}

async fn create_booking(
    State(session): State<Arc<Session>>,
    Json(new): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = session.book(new)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn block_slot(
    State(session): State<Arc<Session>>,
    Json(block): Json<BlockSlot>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = session.block_slot(block.venue_id, block.date, block.time)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn cancel_booking(
    State(session): State<Arc<Session>>,
    Path(booking_id): Path<String>,
) -> StatusCode {
    session.cancel(&BookingId(booking_id));
    StatusCode::NO_CONTENT
}

async fn list_bookings(
    State(session): State<Arc<Session>>,
    Query(query): Query<BookingsQuery>,
) -> Json<Vec<Booking>> {
    let mut bookings = session.bookings(query.filter());
    bookings.retain(|booking| query.accepts(booking));
    Json(bookings)
}

async fn user_bookings(
    State(session): State<Arc<Session>>,
    Path(user_id): Path<UserId>,
) -> Json<UserBookings> {
    Json(session.user_bookings(user_id))
}

/// Create the bookings module over a shared session
pub fn create_module(session: Arc<Session>) -> Arc<dyn Module> {
    Arc::new(BookingsModule::new(session))
}
