//! Stub backend helpers shared by the integration tests.

use axum::Router;
use serde_json::{Value, json};
use url::Url;

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind loopback listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

pub fn user_json(id: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "username": id,
        "role": "viewer",
        "isActive": true,
        "isVerified": true,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
    })
}

pub fn auth_response_json(id: &str, token: &str) -> Value {
    json!({
        "user": user_json(id),
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
    })
}
