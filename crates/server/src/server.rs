use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{blackouts, bookings, expenses, properties, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/properties",
            post(properties::create).get(properties::list),
        )
        .route("/properties/{property_id}", get(properties::detail))
        .route(
            "/properties/{property_id}/ownerships",
            post(properties::upsert_ownership),
        )
        .route(
            "/properties/{property_id}/ownerships/{ownership_id}",
            axum::routing::delete(properties::remove_ownership),
        )
        .route(
            "/properties/{property_id}/availability",
            get(bookings::availability),
        )
        .route(
            "/properties/{property_id}/bookings",
            post(bookings::create).get(bookings::list),
        )
        .route("/bookings/{booking_id}", get(bookings::detail))
        .route("/bookings/{booking_id}/votes", post(bookings::vote))
        .route("/bookings/{booking_id}/cancel", post(bookings::cancel))
        .route(
            "/properties/{property_id}/blackouts",
            post(blackouts::create).get(blackouts::list),
        )
        .route(
            "/blackouts/{blackout_id}",
            axum::routing::delete(blackouts::remove),
        )
        .route(
            "/properties/{property_id}/expenses",
            post(expenses::create).get(expenses::list),
        )
        .route("/expenses/{expense_id}", get(expenses::detail))
        .route("/expenses/{expense_id}/approvals", post(expenses::approve))
        .route(
            "/expenses/{expense_id}/reimburse",
            post(expenses::reimburse),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();

        let engine = Engine::builder().database(db.clone()).build().await.unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth(username: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {encoded}")
    }

    #[tokio::test]
    async fn missing_credentials_is_unauthorized() {
        let router = test_router().await;
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/properties")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let router = test_router().await;
        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/properties")
                    .header(header::AUTHORIZATION, basic_auth("alice", "nope"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_and_list_properties() {
        let router = test_router().await;

        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/properties")
                    .header(header::AUTHORIZATION, basic_auth("alice", "password"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "name": "Baita al Lago",
                            "nightly_rate_cents": 35000,
                            "cleaning_fee_cents": 12000,
                            "min_nights": 2
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .uri("/properties")
                    .header(header::AUTHORIZATION, basic_auth("alice", "password"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["properties"][0]["name"], "Baita al Lago");
    }

    #[tokio::test]
    async fn booking_vote_flow_over_http() {
        let router = test_router().await;
        let auth = basic_auth("alice", "password");

        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/properties")
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "name": "Baita",
                            "nightly_rate_cents": 35000,
                            "cleaning_fee_cents": 12000,
                            "min_nights": 1
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let property: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let property_id = property["id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri(format!("/properties/{property_id}/bookings"))
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "start_date": "2026-07-01",
                            "end_date": "2026-07-04"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let booking: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(booking["total_cents"], 117000);
        let booking_id = booking["id"].as_str().unwrap().to_string();

        // The creator holds the whole voting power, so one approval decides.
        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri(format!("/properties/{property_id}"))
                    .header(header::AUTHORIZATION, &auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let detail: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let ownership_id = detail["ownerships"][0]["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri(format!("/bookings/{booking_id}/votes"))
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "ownership_id": ownership_id,
                            "choice": "approve"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let decided: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(decided["booking"]["status"], "approved");
        assert_eq!(
            decided["booking"]["decision_summary"],
            "Approved with 1/1 voting power"
        );
    }
}
