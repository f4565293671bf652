use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};

use crate::dto::question_dto::QuestionDraftsResponse;
use crate::error::Error;
use crate::middleware::auth::CurrentAdmin;
use crate::utils::pdf::{extract_pdf_text, normalize_extracted_text};
use crate::AppState;

/// Suggests questions from an uploaded paper (`file`) or pasted `text`.
/// Nothing is stored; the editor saves the accepted drafts via bulk create.
#[axum::debug_handler]
pub async fn create_question_drafts(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(test_id): Path<i64>,
    mut multipart: Multipart,
) -> crate::error::Result<impl IntoResponse> {
    state
        .test_service
        .get_owned(test_id, current.admin.id, "edit questions of this test")
        .await?;
    if !state.extraction_service.is_enabled() {
        return Err(Error::Unavailable(
            "Question extraction is not configured".to_string(),
        ));
    }

    let mut text: Option<String> = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    return Err(Error::BadRequest("Uploaded file is empty".to_string()));
                }
                tracing::info!(test_id, size = bytes.len(), "extracting text from PDF");
                text = Some(extract_pdf_text(bytes).await?);
            }
            "text" => {
                let raw = field.text().await?;
                let normalized = normalize_extracted_text(&raw);
                if !normalized.is_empty() {
                    text = Some(normalized);
                }
            }
            _ => {}
        }
    }

    let text = text.ok_or_else(|| {
        Error::BadRequest("Provide a PDF in `file` or plain text in `text`".to_string())
    })?;
    let questions = state.extraction_service.extract_questions(&text).await?;
    tracing::info!(test_id, drafts = questions.len(), "question drafts extracted");
    Ok(Json(QuestionDraftsResponse { questions }))
}
