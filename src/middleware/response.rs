use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Successful JSON payload, sent as `{ "success": true, "data": ... }`.
/// Failures go through `ApiError`, which uses the matching error envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    data: &'a T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // axum's Json answers 500 itself if serialization fails
        Json(Envelope {
            success: true,
            data: &self.data,
        })
        .into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
