//! 관리자 라우트 통합 테스트.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::*;
use serde_json::json;

const ADMIN_ROUTES: &[(&str, &str)] = &[
    ("GET", "/admin/users"),
    ("GET", "/admin/tasks"),
    ("GET", "/admin/analytics"),
    ("GET", "/admin/projects"),
    ("DELETE", "/admin/tasks/purge-old"),
    ("PUT", "/admin/tasks/1/approve"),
    ("PUT", "/admin/tasks/1/reject"),
    ("DELETE", "/admin/tasks/1"),
];

fn method(name: &str) -> Method {
    name.parse().unwrap()
}

#[tokio::test]
async fn test_admin_routes_reject_anonymous_and_users() {
    let app = test_app();
    let token = user_token(&app, "Alice", "alice@x.com", "pw123").await;

    for (verb, uri) in ADMIN_ROUTES {
        let (status, body) = send(&app, method(verb), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{verb} {uri}");
        assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");

        let (status, body) = send(&app, method(verb), uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{verb} {uri}");
        assert_eq!(body["code"], "ADMIN_REQUIRED");
    }
}

#[tokio::test]
async fn test_list_users_hides_credentials() {
    let app = test_app();
    let admin = admin_token(&app).await;
    register(&app, "Alice", "alice@x.com", "pw123").await;
    register(&app, "Bob", "bob@x.com", "pw456").await;

    let (status, body) = send(&app, Method::GET, "/admin/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "alice@x.com");
    assert_eq!(users[0]["role"], "USER");
    assert!(users[0].get("password").is_none());
    assert!(users[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_assign_task_to_user() {
    let app = test_app();
    let admin = admin_token(&app).await;
    register(&app, "Alice", "alice@x.com", "pw123").await;

    let (_, users) = send(&app, Method::GET, "/admin/users", Some(&admin), None).await;
    let alice_id = users[0]["id"].as_i64().unwrap();

    let (status, task) = send(
        &app,
        Method::POST,
        &format!("/admin/tasks/assign?userId={alice_id}"),
        Some(&admin),
        Some(json!({ "title": "Onboarding", "dueDate": "2030-01-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["userId"], alice_id);
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["dueDate"], "2030-01-15");

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/tasks/assign?userId=9999",
        Some(&admin),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_approve_and_reject() {
    let app = test_app();
    let admin = admin_token(&app).await;
    let id = create_task(&app, &admin, json!({ "title": "Design review" })).await;

    // adminEmail은 무시되고 호출자 신원이 기록됨
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/tasks/{id}/approve?adminEmail=someone@else.com"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");
    assert_eq!(body["approvedBy"], SUPERUSER_EMAIL);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/tasks/{id}/reject"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "REJECTED");
    assert!(body["approvedBy"].is_null());

    let (status, _) = send(&app, Method::PUT, "/admin/tasks/999/approve", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_keeps_status() {
    let app = test_app();
    let admin = admin_token(&app).await;
    let id = create_task(&app, &admin, json!({ "title": "Old title" })).await;
    send(&app, Method::PUT, &format!("/admin/tasks/{id}/approve"), Some(&admin), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/admin/tasks/{id}"),
        Some(&admin),
        Some(json!({ "title": "New title", "status": "PENDING" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "New title");
    assert_eq!(body["status"], "APPROVED");
}

#[tokio::test]
async fn test_admin_delete() {
    let app = test_app();
    let admin = admin_token(&app).await;
    let id = create_task(&app, &admin, json!({ "title": "Obsolete" })).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/admin/tasks/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted by Admin");

    let (status, _) = send(&app, Method::DELETE, &format!("/admin/tasks/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_purge_old_approved_tasks() {
    let app = test_app();
    let admin = admin_token(&app).await;

    let old = (Utc::now() - Duration::days(60)).date_naive().to_string();
    let recent = (Utc::now() - Duration::days(5)).date_naive().to_string();

    let old_approved = create_task(&app, &admin, json!({ "title": "Old", "dueDate": old })).await;
    let recent_approved = create_task(&app, &admin, json!({ "title": "Recent", "dueDate": recent })).await;
    let old_pending = create_task(&app, &admin, json!({ "title": "Old pending", "dueDate": old })).await;

    for id in [old_approved, recent_approved] {
        let (status, _) = send(&app, Method::PUT, &format!("/admin/tasks/{id}/approve"), Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::DELETE, "/admin/tasks/purge-old", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "1 old tasks purged.");

    let (_, tasks) = send(&app, Method::GET, "/tasks", None, None).await;
    let ids: Vec<i64> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![recent_approved, old_pending]);

    let (_, body) = send(&app, Method::DELETE, "/admin/tasks/purge-old", Some(&admin), None).await;
    assert_eq!(body["message"], "0 old tasks purged.");
}

#[tokio::test]
async fn test_analytics() {
    let app = test_app();
    let admin = admin_token(&app).await;
    register(&app, "Alice", "alice@x.com", "pw123").await;

    let first = create_task(&app, &admin, json!({ "title": "One" })).await;
    create_task(&app, &admin, json!({ "title": "Two" })).await;
    create_task(&app, &admin, json!({ "title": "Three" })).await;
    send(&app, Method::PUT, &format!("/admin/tasks/{first}/approve"), Some(&admin), None).await;

    let (status, body) = send(&app, Method::GET, "/admin/analytics", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 1);
    assert_eq!(body["totalTasks"], 3);
    assert_eq!(body["completedTasks"], 1);
    assert_eq!(body["pendingTasks"], 2);
}

#[tokio::test]
async fn test_announcements_are_public() {
    let app = test_app();
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/announcements",
        Some(&admin),
        Some(json!({ "title": "Maintenance", "content": "Tonight 22:00", "type": "WARNING" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "WARNING");

    let (status, body) = send(&app, Method::GET, "/tasks/announcements", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Maintenance");
}

#[tokio::test]
async fn test_projects() {
    let app = test_app();
    let admin = admin_token(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/admin/projects",
        Some(&admin),
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, project) = send(
        &app,
        Method::POST,
        "/admin/projects",
        Some(&admin),
        Some(json!({ "name": "Apollo", "description": "Moonshot" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["name"], "Apollo");

    let (status, body) = send(&app, Method::GET, "/admin/projects", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_project_members_deduped_and_checked() {
    let app = test_app();
    let admin = admin_token(&app).await;
    register(&app, "Alice", "alice@x.com", "pw123").await;

    let (_, users) = send(&app, Method::GET, "/admin/users", Some(&admin), None).await;
    let alice_id = users[0]["id"].as_i64().unwrap();

    let (status, project) = send(
        &app,
        Method::POST,
        "/admin/projects",
        Some(&admin),
        Some(json!({ "name": "Apollo", "memberIds": [alice_id, alice_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["memberIds"], json!([alice_id]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/projects",
        Some(&admin),
        Some(json!({ "name": "Gemini", "memberIds": [alice_id, 9999] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (_, body) = send(&app, Method::GET, "/admin/projects", Some(&admin), None).await;
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0], project);
}

#[tokio::test]
async fn test_task_project_must_exist() {
    let app = test_app();
    let admin = admin_token(&app).await;

    let (_, project) = send(
        &app,
        Method::POST,
        "/admin/projects",
        Some(&admin),
        Some(json!({ "name": "Apollo" })),
    )
    .await;
    let project_id = project["id"].as_i64().unwrap();

    let (status, task) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&admin),
        Some(json!({ "title": "Launch", "projectId": project_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["projectId"], project_id);

    let (status, body) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&admin),
        Some(json!({ "title": "Orphan", "projectId": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    register(&app, "Alice", "alice@x.com", "pw123").await;
    let (_, users) = send(&app, Method::GET, "/admin/users", Some(&admin), None).await;
    let alice_id = users[0]["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/admin/tasks/assign?userId={alice_id}"),
        Some(&admin),
        Some(json!({ "title": "Orphan", "projectId": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tasks) = send(&app, Method::GET, "/tasks", None, None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}
