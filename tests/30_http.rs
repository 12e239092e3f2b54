mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use pmo_tracker::database::MemoryDirectory;

use common::{existing_user, spawn_app, spawn_app_with, token_for, BrokenDirectory, StubProvider};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = spawn_app().await?;
    let res = app.get("/health", None).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["directory"], "ok");
    Ok(())
}

#[tokio::test]
async fn me_requires_a_token() -> Result<()> {
    let app = spawn_app().await?;

    let res = app.get("/api/me", None).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");

    let res = app.get("/api/me", Some("not-a-jwt")).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn first_request_creates_a_shadow_project_manager() -> Result<()> {
    let app = spawn_app().await?;
    let token = token_for("pm@example.com", "ext-pm");

    let res = app.get("/api/me", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;

    let data = &body["data"];
    assert_eq!(data["user"]["username"], "pm@example.com");
    assert_eq!(data["user"]["role"], "ProjectManager");
    assert_eq!(data["user"]["external_id"], "ext-pm");
    assert_eq!(data["role_name"], "Project Manager");
    assert_eq!(data["hierarchy_level"], 40);
    assert!(data["capabilities"]
        .as_array()
        .unwrap()
        .contains(&json!("Projects.Edit")));
    assert_eq!(
        data["transitions"]["weekly_update"],
        json!(["Draft", "Submitted"])
    );

    // Same identity resolves to the same row
    let again = app.get("/api/me", Some(&token)).await?.json::<Value>().await?;
    assert_eq!(again["data"]["user"]["id"], data["user"]["id"]);
    Ok(())
}

#[tokio::test]
async fn permission_checks_follow_the_catalog() -> Result<()> {
    let app = spawn_app().await?;
    let token = token_for("pm@example.com", "ext-pm");

    let body = app
        .get("/api/me/permissions/Projects.Edit", Some(&token))
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"], json!({ "capability": "Projects.Edit", "granted": true }));

    let body = app
        .get("/api/me/permissions/Users.Manage", Some(&token))
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["granted"], false);
    Ok(())
}

#[tokio::test]
async fn transition_check_reports_loose_decisions() -> Result<()> {
    let app = spawn_app().await?;
    let token = token_for("pm@example.com", "ext-pm");

    let res = app
        .post(
            "/api/transitions/check",
            Some(&token),
            json!({ "entity": "project", "from": "Draft", "to": "Completed" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["allowed"], true);
    assert_eq!(body["data"]["role"], "ProjectManager");

    let body = app
        .post(
            "/api/transitions/check",
            Some(&token),
            json!({ "entity": "change_request", "from": "Submitted", "to": "Approved" }),
        )
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["allowed"], false);
    Ok(())
}

#[tokio::test]
async fn unknown_status_is_a_validation_error() -> Result<()> {
    let app = spawn_app().await?;
    let token = token_for("pm@example.com", "ext-pm");

    let res = app
        .post(
            "/api/transitions/check",
            Some(&token),
            json!({ "entity": "weekly_update", "from": "Draft", "to": "Shredded" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["field_errors"]["status"], "Unknown weekly_update status: Shredded");
    Ok(())
}

#[tokio::test]
async fn roles_are_listed_highest_first() -> Result<()> {
    let app = spawn_app().await?;
    let body = app.get("/api/roles", None).await?.json::<Value>().await?;

    let roles = body["data"].as_array().unwrap();
    assert_eq!(roles.len(), 5);
    assert_eq!(roles[0]["id"], "Admin");
    assert_eq!(roles[0]["manage_roles"], true);
    assert_eq!(roles[4]["id"], "TeamMember");
    assert_eq!(roles[4]["manage_projects"], false);
    Ok(())
}

#[tokio::test]
async fn sync_failure_continues_unauthenticated() -> Result<()> {
    let app = spawn_app_with(Arc::new(BrokenDirectory), Arc::new(StubProvider::default())).await?;
    let token = token_for("pm@example.com", "ext-pm");

    // Valid token, but the user could not be loaded
    let res = app.get("/api/me", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.get("/api/roles", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get("/health", None).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn inactive_user_continues_unauthenticated() -> Result<()> {
    let directory = Arc::new(MemoryDirectory::new());
    let mut user = existing_user("gone@example.com", "ProjectManager", None, Some("ext-gone"));
    user.is_active = false;
    directory.insert_user(user).await?;

    let app = spawn_app_with(directory, Arc::new(StubProvider::default())).await?;
    let token = token_for("gone@example.com", "ext-gone");

    let res = app.get("/api/me", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.get("/api/roles", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_goes_through_the_provider() -> Result<()> {
    let provider = StubProvider::default().with_account("dir@example.com", "hunter2", "ext-dir");
    let app = spawn_app_with(Arc::new(MemoryDirectory::new()), Arc::new(provider)).await?;

    let res = app
        .post("/auth/login", None, json!({ "email": "dir@example.com", "password": "hunter2" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["user"]["external_id"], "ext-dir");

    let res = app
        .post("/auth/login", None, json!({ "email": "dir@example.com", "password": "wrong" }))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn login_without_a_provider_fails_as_unauthorized() -> Result<()> {
    let app = spawn_app().await?;
    let res = app
        .post("/auth/login", None, json!({ "email": "pm@example.com", "password": "x" }))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn password_reset_always_accepts() -> Result<()> {
    let provider = StubProvider::default()
        .with_account("dir@example.com", "hunter2", "ext-dir")
        .failing_resets();
    let app = spawn_app_with(Arc::new(MemoryDirectory::new()), Arc::new(provider)).await?;

    for email in ["dir@example.com", "nobody@example.com"] {
        let res = app
            .post("/auth/password-reset", None, json!({ "email": email }))
            .await?;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], true);
    }
    Ok(())
}
