//! Blog handlers

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scribe_axum::RequireAuth;
use scribe_db::{CreateBlog, UpdateBlog};
use scribe_types::{BlogId, BlogPost};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::UploadForm;

#[derive(Debug, Serialize)]
pub struct CreateBlogResponse {
    pub message: &'static str,
    pub blog_id: BlogId,
}

#[derive(Debug, Serialize)]
pub struct DeleteBlogResponse {
    pub message: &'static str,
}

/// Partial update body; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub about: Option<String>,
}

impl UpdateBlogRequest {
    fn into_patch(self) -> ApiResult<UpdateBlog> {
        let clean = |field: &str, value: Option<String>| -> ApiResult<Option<String>> {
            match value.map(|v| v.trim().to_string()) {
                Some(v) if v.is_empty() => Err(ApiError::BadRequest(format!("{field} cannot be empty"))),
                other => Ok(other),
            }
        };

        let patch = UpdateBlog {
            title: clean("title", self.title)?,
            category: clean("category", self.category)?,
            about: clean("about", self.about)?,
        };
        if patch.is_empty() {
            return Err(ApiError::BadRequest("nothing to update".to_string()));
        }
        Ok(patch)
    }
}

fn parse_blog_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid blog id".to_string()))
}

/// POST /api/blogs (admin)
///
/// Multipart: `title, category, about, blogImage`
pub async fn create_blog(
    State(state): State<AppState>,
    auth: RequireAuth,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CreateBlogResponse>)> {
    let mut form = UploadForm::read(multipart, "blogImage").await?;
    let image = form.take_image("blog image")?;

    let (Some(title), Some(category), Some(about)) =
        (form.text("title"), form.text("category"), form.text("about"))
    else {
        return Err(ApiError::BadRequest(
            "title, category, and about are required fields".to_string(),
        ));
    };

    let media = match state.media.upload(image.path()).await {
        Ok(media) => {
            metrics::counter!("scribe_media_uploads_total", "outcome" => "success").increment(1);
            media
        }
        Err(e) => {
            metrics::counter!("scribe_media_uploads_total", "outcome" => "failure").increment(1);
            return Err(e.into());
        }
    };

    let author = &auth.user;
    let created = state
        .blogs
        .create(CreateBlog {
            id: Uuid::new_v4(),
            title,
            category,
            about,
            image: media.clone(),
            author_name: author.name.clone(),
            author_image: Some(author.photo.url.clone()),
            created_by: author.id,
        })
        .await;

    let row = match created {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) = state.media.delete(&media.storage_id).await {
                tracing::warn!(error = %cleanup, storage_id = %media.storage_id, "Failed to delete orphaned blog image");
            }
            return Err(e.into());
        }
    };

    tracing::info!(blog_id = %row.id, user_id = %author.id, "Blog created");
    Ok((
        StatusCode::CREATED,
        Json(CreateBlogResponse {
            message: "Blog created successfully",
            blog_id: row.blog_id(),
        }),
    ))
}

/// GET /api/blogs
pub async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<BlogPost>>> {
    let rows = state.blogs.list_all().await?;
    Ok(Json(rows.into_iter().map(|row| row.into_post()).collect()))
}

/// GET /api/blogs/mine (admin)
pub async fn my_blogs(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> ApiResult<Json<Vec<BlogPost>>> {
    let rows = state.blogs.list_by_creator(auth.user_id().0).await?;
    Ok(Json(rows.into_iter().map(|row| row.into_post()).collect()))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlogPost>> {
    let id = parse_blog_id(&id)?;
    let row = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;
    Ok(Json(row.into_post()))
}

/// PUT /api/blogs/{id} (admin)
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBlogRequest>,
) -> ApiResult<Json<BlogPost>> {
    let id = parse_blog_id(&id)?;
    let patch = req.into_patch()?;
    let row = state
        .blogs
        .update(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;
    Ok(Json(row.into_post()))
}

/// DELETE /api/blogs/{id} (admin)
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteBlogResponse>> {
    let id = parse_blog_id(&id)?;
    let row = state
        .blogs
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound("Blog"))?;

    if let Err(e) = state.media.delete(&row.image_storage_id).await {
        tracing::warn!(error = %e, storage_id = %row.image_storage_id, "Failed to delete blog image");
    }

    Ok(Json(DeleteBlogResponse {
        message: "Blog deleted successfully",
    }))
}
