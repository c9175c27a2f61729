pub mod channels;
pub mod tags;

use axum::http::{Method, Uri};

use crate::response::ApiResponse;

pub async fn not_found(uri: Uri) -> ApiResponse<()> {
    ApiResponse::failure(format!("no route for {}", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiResponse<()> {
    ApiResponse::failure(format!("{} is not allowed on {}", method, uri.path()))
}
