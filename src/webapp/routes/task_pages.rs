use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::db::enums::TaskStatus;
use crate::web::models::{CommentResponse, TagResponse, TaskResponse};
use crate::webapp::WebState;
use crate::webapp::error::WebAppError;
use crate::webapp::flash::{set_flash, take_flash};
use crate::webapp::models::{ReturnForm, StatusForm, TaskForm, index_location, list_location};
use crate::webapp::routes::{STATUSES, form_error};
use crate::webapp::views::page_context;

pub fn task_pages() -> Router<Arc<WebState>> {
    Router::new()
        .route("/lists/{id}/tasks/new", get(new_task_form).post(create_task))
        .route("/tasks/{id}", get(task_details))
        .route("/tasks/{id}/edit", get(edit_task_form).post(update_task))
        .route("/tasks/{id}/delete", get(delete_task_confirm).post(delete_task))
        .route("/tasks/{id}/status", post(change_status))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskDetailsPage {
    task: TaskResponse,
    comments: Vec<CommentResponse>,
    tags: Vec<TagResponse>,
    statuses: [&'static str; 3],
    back_url: String,
}

async fn task_details(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(task_id): Path<i32>,
) -> Result<Response, WebAppError> {
    let task = state.api.task(task_id).await?;
    let (comments, tags) = tokio::try_join!(
        state.api.comments(task_id),
        state.api.tags_for_task(task_id),
    )?;

    let page = TaskDetailsPage {
        back_url: list_location(task.todo_list_id),
        task,
        comments,
        tags,
        statuses: STATUSES,
    };
    let (jar, flash) = take_flash(jar);
    let html = state
        .views
        .render("task_details.html", &page_context(&page, flash)?)?;
    Ok((jar, html).into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskFormPage {
    heading: &'static str,
    action: String,
    form: TaskForm,
    error: Option<String>,
    cancel_url: String,
    statuses: [&'static str; 3],
    editing: bool,
}

impl TaskFormPage {
    fn create(list_id: i32, form: TaskForm) -> Self {
        Self {
            heading: "New task",
            action: format!("/lists/{list_id}/tasks/new"),
            form,
            error: None,
            cancel_url: list_location(list_id),
            statuses: STATUSES,
            editing: false,
        }
    }

    fn edit(task_id: i32, list_id: i32, form: TaskForm) -> Self {
        Self {
            heading: "Edit task",
            action: format!("/tasks/{task_id}/edit"),
            form,
            error: None,
            cancel_url: list_location(list_id),
            statuses: STATUSES,
            editing: true,
        }
    }
}

fn render_task_form(state: &WebState, page: &TaskFormPage) -> Result<Response, WebAppError> {
    let html = state.views.render("task_form.html", &page_context(page, None)?)?;
    Ok(html.into_response())
}

async fn new_task_form(
    State(state): State<Arc<WebState>>,
    Path(list_id): Path<i32>,
) -> Result<Response, WebAppError> {
    // Fails early when the list is missing or not ours.
    state.api.list(list_id).await?;
    let form = TaskForm {
        status: TaskStatus::NotStarted.to_string(),
        ..Default::default()
    };
    render_task_form(&state, &TaskFormPage::create(list_id, form))
}

async fn create_task(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(list_id): Path<i32>,
    Form(form): Form<TaskForm>,
) -> Result<Response, WebAppError> {
    let mut page = TaskFormPage::create(list_id, form.clone());
    let request = match form.to_create_request() {
        Ok(request) => request,
        Err(message) => {
            page.error = Some(message);
            return render_task_form(&state, &page);
        }
    };

    match state.api.create_task(list_id, &request).await {
        Ok(_) => {
            let jar = set_flash(jar, "Task created.");
            Ok((jar, Redirect::to(&list_location(list_id))).into_response())
        }
        Err(err) => {
            page.error = Some(form_error(err)?);
            render_task_form(&state, &page)
        }
    }
}

async fn edit_task_form(
    State(state): State<Arc<WebState>>,
    Path(task_id): Path<i32>,
) -> Result<Response, WebAppError> {
    let task = state.api.task(task_id).await?;
    let page = TaskFormPage::edit(task_id, task.todo_list_id, TaskForm::from_task(&task));
    render_task_form(&state, &page)
}

async fn update_task(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(task_id): Path<i32>,
    Form(form): Form<TaskForm>,
) -> Result<Response, WebAppError> {
    let task = state.api.task(task_id).await?;
    let list_id = task.todo_list_id;
    let mut page = TaskFormPage::edit(task_id, list_id, form.clone());

    let request = match form.to_update_request() {
        Ok(request) => request,
        Err(message) => {
            page.error = Some(message);
            return render_task_form(&state, &page);
        }
    };

    match state.api.update_task(task_id, &request).await {
        Ok(()) => {
            let jar = set_flash(jar, "Task updated.");
            Ok((jar, Redirect::to(&list_location(list_id))).into_response())
        }
        Err(err) => {
            page.error = Some(form_error(err)?);
            render_task_form(&state, &page)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskDeletePage {
    task: TaskResponse,
    return_to: String,
}

async fn delete_task_confirm(
    State(state): State<Arc<WebState>>,
    Path(task_id): Path<i32>,
) -> Result<Response, WebAppError> {
    let task = state.api.task(task_id).await?;
    let page = TaskDeletePage {
        return_to: format!("selectedId={}", task.todo_list_id),
        task,
    };
    let html = state
        .views
        .render("task_delete.html", &page_context(&page, None)?)?;
    Ok(html.into_response())
}

async fn delete_task(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(task_id): Path<i32>,
    Form(form): Form<ReturnForm>,
) -> Result<Response, WebAppError> {
    state.api.delete_task(task_id).await?;
    let jar = set_flash(jar, "Task deleted.");
    let location = index_location(form.return_to.as_deref());
    Ok((jar, Redirect::to(&location)).into_response())
}

/// Posted from the selected list's task table and from the assigned-to-me panel;
/// both send the index query to return to.
async fn change_status(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(task_id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Response, WebAppError> {
    let status = form
        .status
        .parse::<TaskStatus>()
        .map_err(|e| WebAppError::BadRequest(e.to_string()))?;

    state.api.change_status(task_id, status).await?;
    let jar = set_flash(jar, "Status updated.");
    let location = index_location(form.return_to.as_deref());
    Ok((jar, Redirect::to(&location)).into_response())
}
