use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::web::models::{TagResponse, TaskResponse, TodoListResponse};
use crate::webapp::WebState;
use crate::webapp::api_client::AssignedFilter;
use crate::webapp::error::WebAppError;
use crate::webapp::flash::{set_flash, take_flash};
use crate::webapp::models::{IndexQuery, IndexState, ListForm, Pager, list_location};
use crate::webapp::routes::{STATUSES, form_error};
use crate::webapp::views::page_context;

pub fn list_pages() -> Router<Arc<WebState>> {
    Router::new()
        .route("/", get(index))
        .route("/lists/new", get(new_list_form).post(create_list))
        .route("/lists/{id}/edit", get(edit_list_form).post(update_list))
        .route("/lists/{id}/delete", get(delete_list_confirm).post(delete_list))
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct IndexLinks {
    lists_previous: Option<String>,
    lists_next: Option<String>,
    tasks_previous: Option<String>,
    tasks_next: Option<String>,
    assigned_previous: Option<String>,
    assigned_next: Option<String>,
    /// Index state without a selection; a list link appends `selectedId`.
    select_base: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexPage {
    state: IndexState,
    return_to: String,
    lists: Vec<TodoListResponse>,
    lists_pager: Pager,
    selected: Option<TodoListResponse>,
    tasks: Vec<TaskResponse>,
    tasks_pager: Option<Pager>,
    assigned: Vec<TaskResponse>,
    assigned_pager: Pager,
    tags: Vec<TagResponse>,
    statuses: [&'static str; 3],
    links: IndexLinks,
}

fn index_link(state: &IndexState, change: impl FnOnce(&mut IndexState)) -> String {
    let mut next = state.clone();
    change(&mut next);
    format!("/?{}", next.to_query())
}

fn build_links(
    state: &IndexState,
    lists: &Pager,
    tasks: Option<&Pager>,
    assigned: &Pager,
) -> IndexLinks {
    let mut links = IndexLinks {
        select_base: {
            let mut base = state.clone();
            base.selected_id = None;
            base.to_query()
        },
        ..Default::default()
    };
    if lists.has_previous {
        links.lists_previous = Some(index_link(state, |s| s.page -= 1));
    }
    if lists.has_next {
        links.lists_next = Some(index_link(state, |s| s.page += 1));
    }
    if let Some(tasks) = tasks {
        if tasks.has_previous {
            links.tasks_previous = Some(index_link(state, |s| s.task_page -= 1));
        }
        if tasks.has_next {
            links.tasks_next = Some(index_link(state, |s| s.task_page += 1));
        }
    }
    if assigned.has_previous {
        links.assigned_previous = Some(index_link(state, |s| s.a_page -= 1));
    }
    if assigned.has_next {
        links.assigned_next = Some(index_link(state, |s| s.a_page += 1));
    }
    links
}

async fn index(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Query(query): Query<IndexQuery>,
) -> Result<Response, WebAppError> {
    let index_state = IndexState::from(query);
    let filter = AssignedFilter {
        status: Some(index_state.a_status),
        sort_by: None,
        order: Some(index_state.a_order.clone()),
        page: index_state.a_page,
        page_size: index_state.a_page_size,
    };

    let (lists, tags, assigned) = tokio::try_join!(
        state.api.lists(index_state.page, index_state.page_size),
        state.api.tags(),
        state.api.assigned_to_me(&filter),
    )?;

    let (selected, tasks, tasks_pager) = match index_state.selected_id {
        Some(list_id) => {
            let (list, tasks) = tokio::try_join!(
                state.api.list(list_id),
                state
                    .api
                    .tasks_by_list(list_id, index_state.task_page, index_state.task_page_size),
            )?;
            let pager = Pager::new(index_state.task_page, index_state.task_page_size, tasks.total);
            (Some(list), tasks.items, Some(pager))
        }
        None => (None, Vec::new(), None),
    };

    let lists_pager = Pager::new(index_state.page, index_state.page_size, lists.total);
    let assigned_pager = Pager::new(index_state.a_page, index_state.a_page_size, assigned.total);
    let links = build_links(&index_state, &lists_pager, tasks_pager.as_ref(), &assigned_pager);

    let page = IndexPage {
        return_to: index_state.to_query(),
        state: index_state,
        lists: lists.items,
        lists_pager,
        selected,
        tasks,
        tasks_pager,
        assigned: assigned.items,
        assigned_pager,
        tags,
        statuses: STATUSES,
        links,
    };

    let (jar, flash) = take_flash(jar);
    let html = state.views.render("index.html", &page_context(&page, flash)?)?;
    Ok((jar, html).into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListFormPage {
    heading: &'static str,
    action: String,
    form: ListForm,
    error: Option<String>,
    cancel_url: String,
}

fn render_list_form(
    state: &WebState,
    page: &ListFormPage,
) -> Result<Response, WebAppError> {
    let html = state.views.render("list_form.html", &page_context(page, None)?)?;
    Ok(html.into_response())
}

async fn new_list_form(State(state): State<Arc<WebState>>) -> Result<Response, WebAppError> {
    let page = ListFormPage {
        heading: "New list",
        action: "/lists/new".to_string(),
        form: ListForm::default(),
        error: None,
        cancel_url: "/".to_string(),
    };
    render_list_form(&state, &page)
}

async fn create_list(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Form(form): Form<ListForm>,
) -> Result<Response, WebAppError> {
    let mut page = ListFormPage {
        heading: "New list",
        action: "/lists/new".to_string(),
        form: form.clone(),
        error: None,
        cancel_url: "/".to_string(),
    };

    let request = match form.validate() {
        Ok(request) => request,
        Err(message) => {
            page.error = Some(message);
            return render_list_form(&state, &page);
        }
    };

    match state.api.create_list(&request).await {
        Ok(list) => {
            let jar = set_flash(jar, "List created.");
            Ok((jar, Redirect::to(&list_location(list.id))).into_response())
        }
        Err(err) => {
            page.error = Some(form_error(err)?);
            render_list_form(&state, &page)
        }
    }
}

async fn edit_list_form(
    State(state): State<Arc<WebState>>,
    Path(list_id): Path<i32>,
) -> Result<Response, WebAppError> {
    let list = state.api.list(list_id).await?;
    let page = ListFormPage {
        heading: "Edit list",
        action: format!("/lists/{list_id}/edit"),
        form: ListForm {
            title: list.title,
            description: list.description.unwrap_or_default(),
        },
        error: None,
        cancel_url: list_location(list_id),
    };
    render_list_form(&state, &page)
}

async fn update_list(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(list_id): Path<i32>,
    Form(form): Form<ListForm>,
) -> Result<Response, WebAppError> {
    let mut page = ListFormPage {
        heading: "Edit list",
        action: format!("/lists/{list_id}/edit"),
        form: form.clone(),
        error: None,
        cancel_url: list_location(list_id),
    };

    let request = match form.validate() {
        Ok(request) => request,
        Err(message) => {
            page.error = Some(message);
            return render_list_form(&state, &page);
        }
    };

    match state.api.update_list(list_id, &request).await {
        Ok(()) => {
            let jar = set_flash(jar, "List updated.");
            Ok((jar, Redirect::to(&list_location(list_id))).into_response())
        }
        Err(err) => {
            page.error = Some(form_error(err)?);
            render_list_form(&state, &page)
        }
    }
}

#[derive(Serialize)]
struct ListDeletePage {
    list: TodoListResponse,
}

async fn delete_list_confirm(
    State(state): State<Arc<WebState>>,
    Path(list_id): Path<i32>,
) -> Result<Response, WebAppError> {
    let list = state.api.list(list_id).await?;
    let html = state
        .views
        .render("list_delete.html", &page_context(&ListDeletePage { list }, None)?)?;
    Ok(html.into_response())
}

async fn delete_list(
    State(state): State<Arc<WebState>>,
    jar: CookieJar,
    Path(list_id): Path<i32>,
) -> Result<Response, WebAppError> {
    state.api.delete_list(list_id).await?;
    let jar = set_flash(jar, "List deleted.");
    Ok((jar, Redirect::to("/")).into_response())
}
