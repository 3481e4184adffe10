// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Response Assertions

use axum::http::StatusCode;
use axum::response::Response;
use ehub_api::ErrorResponseBody;
use serde::de::DeserializeOwned;

/// Reads a response body as JSON.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body is not the expected JSON ({}): {}",
            e,
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Asserts a status and reads the body as JSON.
pub async fn expect_json<T: DeserializeOwned>(response: Response, status: StatusCode) -> T {
    assert_eq!(response.status(), status, "unexpected status");
    read_json(response).await
}

/// Asserts an error response with the given status, kind and message.
pub async fn assert_error(response: Response, status: StatusCode, kind: &str, message: &str) {
    let body: ErrorResponseBody = expect_json(response, status).await;
    assert_eq!(body.error.kind, kind, "unexpected error kind");
    assert_eq!(body.error.message, message, "unexpected error message");
}
