use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};

use crate::{
    error::AppError,
    services::{attachments::UploadedFile, store::ItemKind},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/trips/:id/:kind/:item_id/attachments",
            post(upload_attachments),
        )
        .route("/blobs/:id", get(serve_blob))
}

async fn upload_attachments(
    State(state): State<AppState>,
    Path((trip_id, kind, item_id)): Path<(String, String, String)>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let kind = ItemKind::parse(&kind)
        .ok_or_else(|| AppError::BadRequest("unknown attachment target".into()))?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().unwrap_or("attachment").to_string();
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.to_string()))?
            .to_vec();
        if bytes.is_empty() {
            continue;
        }
        files.push(UploadedFile {
            name,
            media_type,
            bytes,
        });
    }

    if !files.is_empty() {
        let attachments = state.attachments.register(files).await;
        state
            .store
            .add_attachments(&trip_id, kind, &item_id, attachments)
            .await?;
    }

    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn serve_blob(
    State(state): State<AppState>,
    Path(blob_id): Path<String>,
) -> Result<Response, AppError> {
    let blob = state
        .attachments
        .fetch(&blob_id)
        .await
        .ok_or(AppError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, blob.media_type)], blob.bytes).into_response())
}
