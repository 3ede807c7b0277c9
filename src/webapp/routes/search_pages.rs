use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

use crate::web::models::TaskResponse;
use crate::webapp::WebState;
use crate::webapp::api_client::SearchFilter;
use crate::webapp::error::WebAppError;
use crate::webapp::models::{MIXED_SEARCH_MESSAGE, Pager, SearchForm, SearchMode};
use crate::webapp::routes::form_error;
use crate::webapp::views::page_context;

pub fn search_pages() -> Router<Arc<WebState>> {
    Router::new().route("/search", get(search))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    form: SearchForm,
    error: Option<String>,
    searched: bool,
    results: Vec<TaskResponse>,
    pager: Pager,
    previous_url: Option<String>,
    next_url: Option<String>,
}

fn page_url(form: &SearchForm, page: u64) -> String {
    let criteria = form.criteria_query();
    format!("/search?{criteria}&page={page}&pageSize={}", form.page_size())
}

async fn search(
    State(state): State<Arc<WebState>>,
    Query(form): Query<SearchForm>,
) -> Result<Response, WebAppError> {
    let (page_number, page_size) = (form.page(), form.page_size());
    let mut page = SearchPage {
        form: form.clone(),
        error: None,
        searched: false,
        results: Vec::new(),
        pager: Pager::new(page_number, page_size, 0),
        previous_url: None,
        next_url: None,
    };

    match form.mode() {
        SearchMode::None => {}
        SearchMode::Mixed => page.error = Some(MIXED_SEARCH_MESSAGE.to_string()),
        SearchMode::Title | SearchMode::Created | SearchMode::Due => {
            let filter = SearchFilter {
                title: form.title.clone(),
                created_from: form.created_from.clone(),
                created_to: form.created_to.clone(),
                due_from: form.due_from.clone(),
                due_to: form.due_to.clone(),
                page: page_number,
                page_size,
            };
            match state.api.search(&filter).await {
                Ok(found) => {
                    page.searched = true;
                    page.pager = Pager::new(page_number, page_size, found.total);
                    page.results = found.items;
                    if page.pager.has_previous {
                        page.previous_url = Some(page_url(&form, page_number - 1));
                    }
                    if page.pager.has_next {
                        page.next_url = Some(page_url(&form, page_number + 1));
                    }
                }
                Err(err) => page.error = Some(form_error(err)?),
            }
        }
    }

    let html = state.views.render("search.html", &page_context(&page, None)?)?;
    Ok(html.into_response())
}
