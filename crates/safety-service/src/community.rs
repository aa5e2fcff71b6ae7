//! `/api/community` handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use safety_lib::{NewComment, NewPost, Pagination, Post, PostDetail};
use safety_service_shared::{
    json_body, parse_id, ApiError, AppState, CreateCommentRequest, CreatePostRequest, Created,
    PostListQuery, QueryParams, ServiceResponse, Validate,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", collection())
        .route("/{id}", get(get_post))
        .route("/{id}/comments", post(add_comment))
}

/// Handlers for the prefix itself, mounted with and without a trailing slash.
pub fn collection() -> MethodRouter<AppState> {
    get(list_posts).post(create_post)
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub data: Vec<Post>,
    pub pagination: Pagination,
}

/// Newest posts first, content cut to a preview.
async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<ServiceResponse<PostList>, ApiError> {
    let query = PostListQuery::from_params(&params);
    let page = query.page;

    let listed = state
        .run(move |s| s.community().list_posts(Some(&query.category), page))
        .await?;

    Ok(ServiceResponse::new(PostList {
        pagination: page.summary(listed.total_count),
        data: listed.posts.into_iter().map(Post::into_preview).collect(),
    }))
}

async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<ServiceResponse<Created>, ApiError> {
    let request = json_body(payload)?;
    request.validate()?;

    let new: NewPost = request.into();
    let post_id = state.run(move |s| s.community().create_post(&new)).await?;
    info!(post_id, "post created");

    Ok(ServiceResponse::created(Created::new(
        "Post created.",
        "post_id",
        post_id,
    )))
}

/// Full post with comments, oldest first.
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ServiceResponse<PostDetail>, ApiError> {
    let id = parse_id(&id)?;
    let detail = state.run(move |s| s.community().get_post(id)).await?;
    Ok(ServiceResponse::new(detail))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<ServiceResponse<Created>, ApiError> {
    let post_id = parse_id(&id)?;
    let request = json_body(payload)?;
    request.validate()?;

    let new: NewComment = request.into();
    let comment_id = state
        .run(move |s| s.community().add_comment(post_id, &new))
        .await?;
    info!(post_id, comment_id, "comment added");

    Ok(ServiceResponse::created(Created::new(
        "Comment added.",
        "comment_id",
        comment_id,
    )))
}
