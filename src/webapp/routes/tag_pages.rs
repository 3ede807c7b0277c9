use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::web::models::{TagResponse, TaskResponse};
use crate::webapp::WebState;
use crate::webapp::error::WebAppError;
use crate::webapp::flash::{set_flash, take_flash};
use crate::webapp::models::{ReturnForm, TagForm, TagLinkForm, index_location};
use crate::webapp::views::page_context;

pub fn tag_pages() -> Router<Arc<WebState>> {
    Router::new()
        .route("/tags", post(create_tag))
        .route("/tags/{id}/delete", post(delete_tag))
        .route("/tags/{id}/tasks", get(tasks_for_tag))
        .route("/tasks/{id}/tags", get(task_tags))
        .route("/tasks/{id}/tags/add", post(add_tag))
        .route("/tasks/{id}/tags/remove", post(remove_tag))
}

/// A blank name is ignored.
async fn create_tag(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Form(form): Form<TagForm>,
) -> Result<Response, WebAppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }
    state.api.create_tag(name).await?;
    let jar = set_flash(jar, "Tag created.");
    Ok((jar, Redirect::to("/")).into_response())
}

async fn delete_tag(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(tag_id): Path<i32>,
    Form(form): Form<ReturnForm>,
) -> Result<Response, WebAppError> {
    state.api.delete_tag(tag_id).await?;
    let jar = set_flash(jar, "Tag deleted.");
    let location = index_location(form.return_to.as_deref());
    Ok((jar, Redirect::to(&location)).into_response())
}

#[derive(Serialize)]
struct TagTasksPage {
    tag: TagResponse,
    tasks: Vec<TaskResponse>,
}

async fn tasks_for_tag(
    State(state): State<Arc<WebState>>,
    Path(tag_id): Path<i32>,
) -> Result<Response, WebAppError> {
    // The task query answers 404 for an unknown tag before the palette is consulted.
    let tasks = state.api.tasks_for_tag(tag_id).await?;
    let tag = state
        .api
        .tags()
        .await?
        .into_iter()
        .find(|t| t.id == tag_id)
        .ok_or_else(|| WebAppError::NotFound(format!("Tag {tag_id}")))?;

    let html = state
        .views
        .render("tag_tasks.html", &page_context(&TagTasksPage { tag, tasks }, None)?)?;
    Ok(html.into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskTagsPage {
    task: TaskResponse,
    task_tags: Vec<TagResponse>,
    /// Palette tags not yet on the task.
    available_tags: Vec<TagResponse>,
}

fn available(all: Vec<TagResponse>, linked: &[TagResponse]) -> Vec<TagResponse> {
    all.into_iter()
        .filter(|tag| !linked.iter().any(|l| l.id == tag.id))
        .collect()
}

async fn task_tags(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(task_id): Path<i32>,
) -> Result<Response, WebAppError> {
    let task = state.api.task(task_id).await?;
    let (task_tags, all_tags) =
        tokio::try_join!(state.api.tags_for_task(task_id), state.api.tags())?;

    let page = TaskTagsPage {
        available_tags: available(all_tags, &task_tags),
        task,
        task_tags,
    };
    let (jar, flash) = take_flash(jar);
    let html = state
        .views
        .render("task_tags.html", &page_context(&page, flash)?)?;
    Ok((jar, html).into_response())
}

async fn add_tag(
    State(state): State<Arc<WebState>>,
    Path(task_id): Path<i32>,
    Form(form): Form<TagLinkForm>,
) -> Result<Response, WebAppError> {
    state.api.link_tag(task_id, form.tag_id).await?;
    Ok(Redirect::to(&format!("/tasks/{task_id}/tags")).into_response())
}

async fn remove_tag(
    State(state): State<Arc<WebState>>,
    Path(task_id): Path<i32>,
    Form(form): Form<TagLinkForm>,
) -> Result<Response, WebAppError> {
    state.api.unlink_tag(task_id, form.tag_id).await?;
    Ok(Redirect::to(&format!("/tasks/{task_id}/tags")).into_response())
}
