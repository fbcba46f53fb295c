pub mod bookings;
pub mod finance;
pub mod maintenance;
pub mod notifications;
pub mod venues;

use std::sync::Arc;

use malaeb_kernel::ModuleRegistry;

use crate::session::Session;

/// Register every domain module against one shared session
pub fn register_all(registry: &mut ModuleRegistry, session: Arc<Session>) {
    registry.register(venues::create_module(session.clone()));
    registry.register(bookings::create_module(session.clone()));
    registry.register(finance::create_module(session.clone()));
    registry.register(maintenance::create_module(session.clone()));
    registry.register(notifications::create_module(session));
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use malaeb_kernel::{settings::SessionSettings, FixedClock, SequentialIds};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::session::Session;

    pub fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    /// Seeded session frozen at noon on 2024-09-01.
    pub fn session() -> (Arc<Session>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(noon()));
        let session = Session::seeded(
            clock.clone(),
            Arc::new(SequentialIds::starting_at(100)),
            &SessionSettings::default(),
        );
        (Arc::new(session), clock)
    }

    pub async fn call(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
