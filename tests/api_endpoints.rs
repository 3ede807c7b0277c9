mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{SECRET, api, call, token};

#[tokio::test]
async fn health_check_needs_no_identity() {
    let app = api(Some(SECRET)).await;
    let reply = call(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn list_lifecycle_with_paging_header() {
    let app = api(None).await;

    for title in ["Work", "Errands", "Garden"] {
        let reply = call(
            &app,
            Method::POST,
            "/api/lists",
            None,
            Some(json!({ "title": title })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.json["ownerId"], "dev-user");
    }

    let page = call(&app, Method::GET, "/api/lists?page=1&pageSize=2", None, None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.total(), 3);
    let titles: Vec<_> = page.json.as_array().unwrap().iter().map(|l| l["title"].clone()).collect();
    assert_eq!(titles, [json!("Errands"), json!("Garden")]);

    let id = page.json[0]["id"].as_i64().unwrap();
    let updated = call(
        &app,
        Method::PUT,
        &format!("/api/lists/{id}"),
        None,
        Some(json!({ "title": "Chores", "description": "weekly" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::NO_CONTENT);

    let fetched = call(&app, Method::GET, &format!("/api/lists/{id}"), None, None).await;
    assert_eq!(fetched.json["title"], "Chores");
    assert_eq!(fetched.json["description"], "weekly");

    let deleted = call(&app, Method::DELETE, &format!("/api/lists/{id}"), None, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = call(&app, Method::GET, &format!("/api/lists/{id}"), None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), format!("Todo list {id} not found"));
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = api(None).await;
    let reply = call(&app, Method::POST, "/api/lists", None, Some(json!({ "title": "  " }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error(), "Title is required.");
}

#[tokio::test]
async fn lists_are_private_to_their_owner() {
    let app = api(Some(SECRET)).await;
    let alice = token("alice");
    let bob = token("bob");

    let created = call(
        &app,
        Method::POST,
        "/api/lists",
        Some(&alice),
        Some(json!({ "title": "Private" })),
    )
    .await;
    let id = created.json["id"].as_i64().unwrap();

    let reply = call(&app, Method::GET, &format!("/api/lists/{id}"), Some(&bob), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let bobs = call(&app, Method::GET, "/api/lists", Some(&bob), None).await;
    assert_eq!(bobs.total(), 0);

    let reply = call(&app, Method::GET, "/api/lists", Some("not-a-jwt"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tasks_flow_through_assigned_panel() {
    let app = api(None).await;
    let list = call(&app, Method::POST, "/api/lists", None, Some(json!({ "title": "L" }))).await;
    let list_id = list.json["id"].as_i64().unwrap();

    let task = call(
        &app,
        Method::POST,
        &format!("/api/lists/{list_id}/tasks"),
        None,
        Some(json!({ "title": "Pay rent", "dueDate": "2020-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(task.status, StatusCode::CREATED);
    assert_eq!(task.json["status"], "NotStarted");
    assert_eq!(task.json["assigneeId"], "dev-user");
    assert_eq!(task.json["isOverdue"], true);
    let task_id = task.json["id"].as_i64().unwrap();

    let assigned = call(&app, Method::GET, "/api/tasks/assigned-to-me", None, None).await;
    assert_eq!(assigned.total(), 0);

    let changed = call(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{task_id}/status"),
        None,
        Some(json!({ "status": "InProgress" })),
    )
    .await;
    assert_eq!(changed.status, StatusCode::NO_CONTENT);

    let assigned = call(&app, Method::GET, "/api/tasks/assigned-to-me", None, None).await;
    assert_eq!(assigned.total(), 1);
    assert_eq!(assigned.json[0]["title"], "Pay rent");

    let invalid = call(
        &app,
        Method::GET,
        "/api/tasks/assigned-to-me?status=Someday",
        None,
        None,
    )
    .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert!(invalid.error().contains("Someday"));

    let by_list = call(&app, Method::GET, &format!("/api/lists/{list_id}/tasks"), None, None).await;
    assert_eq!(by_list.total(), 1);
}

#[tokio::test]
async fn search_accepts_exactly_one_criterion() {
    let app = api(None).await;
    let list = call(&app, Method::POST, "/api/lists", None, Some(json!({ "title": "L" }))).await;
    let list_id = list.json["id"].as_i64().unwrap();
    for title in ["Buy milk", "Buy 100% juice", "Walk dog"] {
        call(
            &app,
            Method::POST,
            &format!("/api/lists/{list_id}/tasks"),
            None,
            Some(json!({ "title": title })),
        )
        .await;
    }

    let found = call(&app, Method::GET, "/api/tasks/search?title=BUY", None, None).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.total(), 2);

    let literal = call(&app, Method::GET, "/api/tasks/search?title=100%25", None, None).await;
    assert_eq!(literal.total(), 1);

    let mixed = call(
        &app,
        Method::GET,
        "/api/tasks/search?title=buy&dueFrom=2025-01-01",
        None,
        None,
    )
    .await;
    assert_eq!(mixed.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        mixed.error(),
        "Do not mix criteria. Use only one kind: title OR created dates OR due dates."
    );

    let none = call(&app, Method::GET, "/api/tasks/search", None, None).await;
    assert_eq!(none.status, StatusCode::BAD_REQUEST);

    let bad_date = call(&app, Method::GET, "/api/tasks/search?createdFrom=01/02/2025", None, None).await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_date.error(), "Dates must be in YYYY-MM-DD format.");
}

#[tokio::test]
async fn tag_links_are_idempotent() {
    let app = api(None).await;
    let list = call(&app, Method::POST, "/api/lists", None, Some(json!({ "title": "L" }))).await;
    let list_id = list.json["id"].as_i64().unwrap();
    let task = call(
        &app,
        Method::POST,
        &format!("/api/lists/{list_id}/tasks"),
        None,
        Some(json!({ "title": "T" })),
    )
    .await;
    let task_id = task.json["id"].as_i64().unwrap();

    let tag = call(&app, Method::POST, "/api/tags", None, Some(json!({ "name": " urgent " }))).await;
    assert_eq!(tag.status, StatusCode::CREATED);
    assert_eq!(tag.json["name"], "urgent");
    assert!(tag.json["colorHex"].as_str().unwrap().starts_with('#'));
    let tag_id = tag.json["id"].as_i64().unwrap();

    for _ in 0..2 {
        let linked = call(
            &app,
            Method::POST,
            &format!("/api/tasks/{task_id}/tags/{tag_id}"),
            None,
            None,
        )
        .await;
        assert_eq!(linked.status, StatusCode::NO_CONTENT);
    }

    let tags = call(&app, Method::GET, &format!("/api/tasks/{task_id}/tags"), None, None).await;
    assert_eq!(tags.json.as_array().unwrap().len(), 1);

    let tasks = call(&app, Method::GET, &format!("/api/tags/{tag_id}/tasks"), None, None).await;
    assert_eq!(tasks.json[0]["tags"][0]["name"], "urgent");

    let zero = call(&app, Method::POST, &format!("/api/tasks/0/tags/{tag_id}"), None, None).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let unlinked = call(
        &app,
        Method::DELETE,
        &format!("/api/tasks/{task_id}/tags/{tag_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(unlinked.status, StatusCode::NO_CONTENT);
    let again = call(
        &app,
        Method::DELETE,
        &format!("/api/tasks/{task_id}/tags/{tag_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_belong_to_their_author() {
    let app = api(Some(SECRET)).await;
    let alice = token("alice");
    let bob = token("bob");

    let list = call(&app, Method::POST, "/api/lists", Some(&alice), Some(json!({ "title": "L" }))).await;
    let list_id = list.json["id"].as_i64().unwrap();
    let task = call(
        &app,
        Method::POST,
        &format!("/api/lists/{list_id}/tasks"),
        Some(&alice),
        Some(json!({ "title": "T" })),
    )
    .await;
    let task_id = task.json["id"].as_i64().unwrap();

    let comment = call(
        &app,
        Method::POST,
        &format!("/api/tasks/{task_id}/comments"),
        Some(&alice),
        Some(json!({ "text": "On it" })),
    )
    .await;
    assert_eq!(comment.status, StatusCode::CREATED);
    assert_eq!(comment.json["createdByUserId"], "alice");
    let comment_id = comment.json["id"].as_i64().unwrap();

    let listed = call(
        &app,
        Method::GET,
        &format!("/api/tasks/{task_id}/comments"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(listed.json.as_array().unwrap().len(), 1);

    let hijack = call(
        &app,
        Method::PUT,
        &format!("/api/tasks/{task_id}/comments/{comment_id}"),
        Some(&bob),
        Some(json!({ "text": "mine now" })),
    )
    .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let blank = call(
        &app,
        Method::POST,
        &format!("/api/tasks/{task_id}/comments"),
        Some(&alice),
        Some(json!({ "text": "" })),
    )
    .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let deleted = call(
        &app,
        Method::DELETE,
        &format!("/api/tasks/{task_id}/comments/{comment_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unreadable_bodies_are_bad_requests() {
    let app = api(None).await;
    let list = call(&app, Method::POST, "/api/lists", None, Some(json!({ "title": "L" }))).await;
    let list_id = list.json["id"].as_i64().unwrap();
    let task = call(
        &app,
        Method::POST,
        &format!("/api/lists/{list_id}/tasks"),
        None,
        Some(json!({ "title": "Pay rent" })),
    )
    .await;
    let task_id = task.json["id"].as_i64().unwrap();

    let unknown_status = call(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{task_id}/status"),
        None,
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(unknown_status.status, StatusCode::BAD_REQUEST);
    assert!(unknown_status.error().contains("Done"));

    let missing_status = call(
        &app,
        Method::PUT,
        &format!("/api/tasks/{task_id}"),
        None,
        Some(json!({ "title": "Pay rent" })),
    )
    .await;
    assert_eq!(missing_status.status, StatusCode::BAD_REQUEST);
    assert!(missing_status.error().contains("status"));

    let not_an_object = call(&app, Method::POST, "/api/lists", None, Some(json!([1, 2]))).await;
    assert_eq!(not_an_object.status, StatusCode::BAD_REQUEST);
    assert!(!not_an_object.error().is_empty());

    let unchanged = call(&app, Method::GET, &format!("/api/tasks/{task_id}"), None, None).await;
    assert_eq!(unchanged.json["status"], "NotStarted");
}

#[tokio::test]
async fn title_search_ignores_case_of_accented_letters() {
    let app = api(None).await;
    let list = call(&app, Method::POST, "/api/lists", None, Some(json!({ "title": "L" }))).await;
    let list_id = list.json["id"].as_i64().unwrap();
    call(
        &app,
        Method::POST,
        &format!("/api/lists/{list_id}/tasks"),
        None,
        Some(json!({ "title": "Überweisung" })),
    )
    .await;

    for needle in ["%C3%BCberweisung", "%C3%9Cberweisung"] {
        let found = call(
            &app,
            Method::GET,
            &format!("/api/tasks/search?title={needle}"),
            None,
            None,
        )
        .await;
        assert_eq!(found.status, StatusCode::OK);
        assert_eq!(found.total(), 1, "needle {needle}");
        assert_eq!(found.json[0]["title"], "Überweisung");
    }
}
