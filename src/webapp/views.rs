use axum::response::Html;
use rust_embed::RustEmbed;
use serde::Serialize;
use tera::{Context, Tera};

use crate::webapp::error::WebAppError;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

/// Page templates compiled once at startup from the embedded `templates/` folder.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut sources = Vec::new();
        for name in Templates::iter() {
            let Some(file) = Templates::get(&name) else {
                continue;
            };
            let content = String::from_utf8(file.data.into_owned())
                .map_err(|e| tera::Error::msg(format!("Template {name} is not UTF-8: {e}")))?;
            sources.push((name.into_owned(), content));
        }

        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(sources)?;
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<Html<String>, WebAppError> {
        Ok(Html(self.tera.render(template, context)?))
    }
}

/// Builds a context from a serializable page model plus the pending flash message.
pub fn page_context<T: Serialize>(page: &T, flash: Option<String>) -> Result<Context, WebAppError> {
    let mut context = Context::from_serialize(page)?;
    context.insert("flash", &flash);
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(id: i32, title: &str, due: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "todoListId": 1,
            "title": title,
            "description": null,
            "createdDate": "2025-01-01T09:00:00Z",
            "dueDate": due,
            "status": "InProgress",
            "assigneeId": "alice",
            "isOverdue": due.is_some(),
            "tags": [{"id": 1, "name": "home", "colorHex": "#123456", "createdUtc": "2025-01-01T09:00:00Z"}]
        })
    }

    fn pager(total: u64) -> serde_json::Value {
        json!({"page": 1, "pageSize": 5, "total": total, "totalPages": 1, "hasPrevious": false, "hasNext": false})
    }

    #[test]
    fn every_embedded_template_compiles() {
        let views = Views::new().unwrap();
        let names: Vec<_> = views.tera.get_template_names().collect();
        for expected in [
            "base.html",
            "index.html",
            "list_form.html",
            "list_delete.html",
            "task_form.html",
            "task_delete.html",
            "task_details.html",
            "task_tags.html",
            "tag_tasks.html",
            "search.html",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn index_renders_selected_list_and_escapes_titles() {
        let views = Views::new().unwrap();
        let page = json!({
            "state": {"page": 1, "pageSize": 5, "selectedId": 1, "taskPage": 1, "taskPageSize": 5,
                      "aStatus": "InProgress", "aOrder": "asc", "aPage": 1, "aPageSize": 5},
            "returnTo": "page=1&selectedId=1",
            "lists": [{"id": 1, "title": "<Chores>", "description": null, "ownerId": "alice",
                       "createdUtc": "2025-01-01T09:00:00Z", "updatedUtc": null}],
            "listsPager": pager(1),
            "selected": {"id": 1, "title": "<Chores>", "description": "weekly", "ownerId": "alice",
                         "createdUtc": "2025-01-01T09:00:00Z", "updatedUtc": null},
            "tasks": [task(5, "Vacuum", Some("2025-02-03T00:00:00Z"))],
            "tasksPager": pager(1),
            "assigned": [],
            "assignedPager": pager(0),
            "tags": [],
            "statuses": ["NotStarted", "InProgress", "Completed"],
            "links": {"listsPrevious": null, "listsNext": null, "tasksPrevious": null, "tasksNext": null,
                      "assignedPrevious": null, "assignedNext": "/?aPage=2", "selectBase": "page=1"}
        });

        let html = views
            .render("index.html", &page_context(&page, Some("List created.".into())).unwrap())
            .unwrap()
            .0;
        assert!(html.contains("&lt;Chores&gt;"));
        assert!(html.contains("Vacuum"));
        assert!(html.contains("2025-02-03"));
        assert!(html.contains("List created."));
        assert!(html.contains("Overdue"));
    }

    #[test]
    fn search_page_renders_without_results() {
        let views = Views::new().unwrap();
        let page = json!({
            "form": {"title": null, "createdFrom": null, "createdTo": null, "dueFrom": null,
                     "dueTo": null, "page": null, "pageSize": null},
            "error": "Use only one criterion at a time: Title OR Created dates OR Due dates.",
            "searched": false,
            "results": [],
            "pager": pager(0),
            "previousUrl": null,
            "nextUrl": null
        });

        let html = views
            .render("search.html", &page_context(&page, None).unwrap())
            .unwrap()
            .0;
        assert!(html.contains("Use only one criterion at a time"));
        assert!(!html.contains("No tasks match."));
    }

    #[test]
    fn task_details_lists_comments_and_tags() {
        let views = Views::new().unwrap();
        let page = json!({
            "task": task(5, "Vacuum", None),
            "comments": [{"id": 2, "taskId": 5, "text": "done soon", "createdByUserId": "alice",
                          "createdUtc": "2025-01-02T10:30:00Z", "updatedUtc": null}],
            "tags": [{"id": 1, "name": "home", "colorHex": "#123456", "createdUtc": "2025-01-01T09:00:00Z"}],
            "statuses": ["NotStarted", "InProgress", "Completed"],
            "backUrl": "/?selectedId=1"
        });

        let html = views
            .render("task_details.html", &page_context(&page, None).unwrap())
            .unwrap()
            .0;
        assert!(html.contains("done soon"));
        assert!(html.contains("2025-01-02 10:30"));
        assert!(html.contains("home"));
        assert!(!html.contains("No comments yet."));
    }
}
