//! Children editor handler: delete and reorder a container's children.

use crate::api::AppState;
use crate::error::Result;
use crate::gateway::ChildrenEdit;
use crate::utils::is_blank;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use url::form_urlencoded;

/// Form parameter naming the children to delete (repeatable)
pub const PARAM_DELETED_CHILDREN: &str = "deletedChildren";

/// Form parameter naming the children in their desired order (repeatable)
pub const PARAM_ORDERED_CHILDREN: &str = "orderedChildren";

/// Selector and extension that address the editor on a container path
pub const EDITOR_SUFFIX: &str = ".childreneditor.html";

/// POST /{container}.childreneditor.html - Apply a children edit to a container
///
/// The body is `application/x-www-form-urlencoded` with repeatable
/// `deletedChildren` and `orderedChildren` parameters. Deletions are applied
/// first, then the remaining (and newly created) children are reordered to
/// match the `orderedChildren` sequence. Blank parameter values are ignored.
/// A POST whose path does not carry the editor selector and extension does
/// not address this endpoint and is a 404.
#[utoipa::path(
    post,
    path = "/{container}.childreneditor.html",
    tag = "editor",
    params(
        ("container" = String, Path, description = "Path of the container to edit")
    ),
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "Repeatable deletedChildren and orderedChildren parameters"
    ),
    responses(
        (status = 200, description = "Edit applied"),
        (status = 404, description = "Container not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn edit_children(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: String,
) -> Result<impl IntoResponse> {
    let path = format!("/{path}");
    let Some(container) = path.strip_suffix(EDITOR_SUFFIX) else {
        tracing::debug!(path = %path, "POST without the editor selector");
        return Ok(StatusCode::NOT_FOUND);
    };
    let edit = parse_edit(&body);

    if edit.is_empty() {
        tracing::debug!(container = %container, "children edit carried no operations");
        return Ok(StatusCode::OK);
    }

    state.gateway.edit_children(container, &edit).await?;
    Ok(StatusCode::OK)
}

/// Collects the edit operations out of a form-encoded body.
fn parse_edit(body: &str) -> ChildrenEdit {
    let mut edit = ChildrenEdit::default();
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        if is_blank(&value) {
            continue;
        }
        match key.as_ref() {
            PARAM_DELETED_CHILDREN => edit.deleted.push(value.into_owned()),
            PARAM_ORDERED_CHILDREN => edit.ordered.push(value.into_owned()),
            _ => {}
        }
    }
    edit
}
