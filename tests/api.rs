/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! REST API driven through the store client

mod common;

use common::{TestServer, PASSWORD};
use folio_server::client::Upload;
use folio_server::models::{
    module_names, Background, Cursor, NewCustomModule, Project, ProfileUpdate, Skill,
    ThemeDescriptor,
};
use folio_server::ClientError;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn rejected_status(err: ClientError) -> u16 {
    match err {
        ClientError::Rejected { status, .. } => status,
        other => panic!("expected a rejection, got {}", other),
    }
}

#[tokio::test]
async fn health_and_seeded_document_are_public() {
    let server = TestServer::start().await;
    let health = server.get("/health").await;
    assert_eq!(health.status(), 200);

    let doc = assert_ok!(server.client().fetch_document().await);
    assert_eq!(doc.skills.len(), 4);
    assert_eq!(doc.layout.module_order, module_names(["hero", "skills", "projects", "files"]));
    assert!(doc.files.is_empty());

    let raw: serde_json::Value = server.get("/data.json").await.json().await.unwrap();
    assert!(raw.get("password_hash").is_none());
    assert!(raw.get("admin_password").is_none());
}

#[tokio::test]
async fn mutations_require_login() {
    let server = TestServer::start().await;
    let client = server.client();

    let err = assert_err!(client.save_section("skills", &Vec::<Skill>::new()).await);
    assert_eq!(rejected_status(err), 401);

    let err = assert_err!(client.login("not-the-password").await);
    assert_eq!(rejected_status(err), 401);

    assert_ok!(client.login(PASSWORD).await);
    assert_ok!(client.save_section("skills", &Vec::<Skill>::new()).await);

    assert_ok!(client.logout().await);
    assert_err!(client.fetch_stats().await);
}

#[tokio::test]
async fn section_save_replaces_only_that_section() {
    let server = TestServer::start().await;
    let client = server.admin().await;
    let before = client.fetch_document().await.unwrap();

    assert_ok!(client.save_section("skills", &vec![Skill::new("Rust", 95)]).await);
    let after = client.fetch_document().await.unwrap();
    assert_eq!(after.skills.len(), 1);
    assert_eq!(after.skills[0].name, "Rust");
    assert_eq!(after.projects, before.projects);
    assert_eq!(after.profile, before.profile);
}

#[tokio::test]
async fn skills_get_ids_and_profile_merges() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let skills: Vec<Skill> =
        serde_json::from_value(json!([{"name": "Go", "level": 60}, {"name": "SQL", "level": 70}]))
            .unwrap();
    let saved = assert_ok!(client.save_skills(&skills).await);
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|s| !s.id.is_empty()));
    assert_ne!(saved[0].id, saved[1].id);

    let profile = assert_ok!(
        client
            .update_profile(&ProfileUpdate {
                name: Some("Ada".into()),
                bio: Some(String::new()),
                announcement_enabled: Some(true),
                announcement_text: Some("Hiring".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(profile.name.as_deref(), Some("Ada"));
    assert!(profile.bio.is_some());

    let doc = client.fetch_document().await.unwrap();
    assert!(doc.announcement.unwrap().enabled);
}

#[tokio::test]
async fn project_crud() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let draft = Project {
        id: String::new(),
        title: "Compiler".into(),
        description: "A toy compiler".into(),
        image: String::new(),
        link: "https://example.com".into(),
        tags: vec!["Rust".into()],
    };
    let created = assert_ok!(client.create_project(&draft).await);
    assert!(!created.id.is_empty());

    let renamed = Project {
        title: "Optimizing compiler".into(),
        ..created.clone()
    };
    assert_ok!(client.update_project(&created.id, &renamed).await);
    let projects = client.list_projects().await.unwrap();
    assert!(projects.iter().any(|p| p.title == "Optimizing compiler"));

    let err = assert_err!(client.update_project("missing", &renamed).await);
    assert_eq!(rejected_status(err), 404);

    assert_ok!(client.delete_project(&created.id).await);
    let projects = client.list_projects().await.unwrap();
    assert!(projects.iter().all(|p| p.id != created.id));
}

#[tokio::test]
async fn theme_is_stored_as_sum_type_and_painted() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let solid: ThemeDescriptor = serde_json::from_value(json!({
        "background_type": "solid",
        "background_color": "#112233"
    }))
    .unwrap();
    let saved = assert_ok!(client.save_theme(&solid).await);
    assert_eq!(
        saved.background,
        Background::Solid {
            color: Some("#112233".into())
        }
    );

    let html = server.get("/").await.text().await.unwrap();
    assert!(html.contains(r#"class="bg-solid""#));
    assert!(html.contains("--bg-color: #112233"));
    assert!(!html.contains("--bg-end"));
}

#[tokio::test]
async fn custom_modules_join_the_page() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let module = assert_ok!(
        client
            .create_module(&NewCustomModule {
                title: Some("Talks".into()),
                content: Some("Conference talks".into()),
                ..Default::default()
            })
            .await
    );
    assert!(module.id.starts_with("custom_"));

    let layout = client.fetch_layout().await.unwrap();
    assert_eq!(layout.module_order.last().unwrap().as_str(), module.id);
    let html = server.get("/").await.text().await.unwrap();
    assert!(html.contains("Conference talks"));

    // Built-in modules only leave the order
    assert_ok!(client.delete_module("skills").await);
    let layout = client.fetch_layout().await.unwrap();
    assert!(layout.module_order.iter().all(|m| m.as_str() != "skills"));

    let err = assert_err!(client.delete_module("guestbook").await);
    assert_eq!(rejected_status(err), 404);

    assert_ok!(client.delete_module(&module.id).await);
    assert!(client.list_modules().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_layout_renders_placeholder() {
    let server = TestServer::start().await;
    let client = server.admin().await;
    assert_ok!(client.save_module_order(&[]).await);

    let html = server.get("/").await.text().await.unwrap();
    assert!(html.contains("Content failed to load"));
}

#[tokio::test]
async fn file_upload_download_and_delete() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let report = assert_ok!(
        client
            .upload_files(
                vec![
                    Upload::new("cv.pdf", b"%PDF-1.4".to_vec()),
                    Upload::new("virus.exe", b"MZ".to_vec()),
                ],
                Some("docs"),
                Some("Resume"),
            )
            .await
    );
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.errors.len(), 1);
    let entry = &report.files[0];
    assert_eq!(entry.folder.as_deref(), Some("docs"));
    assert_eq!(entry.file_type, "pdf");
    assert_eq!(entry.size, 8);

    let download = server.get(&format!("/files/{}", entry.relative_path)).await;
    assert_eq!(download.status(), 200);
    let disposition = download.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment"));
    assert_eq!(&download.bytes().await.unwrap()[..], b"%PDF-1.4");

    assert_eq!(client.record_download(&entry.id).await.unwrap(), 1);
    assert_ok!(client.track_download(&entry.id).await);
    let files = client.list_files().await.unwrap();
    assert_eq!(files[0].downloads, 2);

    let html = server.get("/").await.text().await.unwrap();
    assert!(html.contains("cv.pdf"));
    assert!(html.contains(&format!("/files/{}", entry.relative_path)));

    let status = client.files_status().await.unwrap();
    assert_eq!(status.missing, 0);

    assert_ok!(client.delete_file(&entry.id).await);
    assert!(client.list_files().await.unwrap().is_empty());
    assert!(!server.files_path().join(&entry.relative_path).exists());
}

#[tokio::test]
async fn upload_with_only_rejected_files_fails() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let err = assert_err!(
        client
            .upload_files(vec![Upload::new("run.sh", b"#!/bin/sh".to_vec())], None, None)
            .await
    );
    assert_eq!(rejected_status(err), 400);
}

#[tokio::test]
async fn download_rejects_path_traversal() {
    let server = TestServer::start().await;
    let response = server.get("/files/..%2Fdata%2Fcredentials.json").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn failed_download_ping_is_swallowed() {
    let server = TestServer::start().await;
    let client = server.client();
    // Unknown id: the ping fails, the task still completes
    assert_ok!(client.track_download("no-such-file").await);
}

#[tokio::test]
async fn avatar_and_cursor_uploads_update_the_document() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let avatar = assert_ok!(client.upload_avatar(Upload::new("me.PNG", b"png".to_vec())).await);
    assert_eq!(avatar, "/static/uploads/avatar.png");
    assert!(server.uploads_path().join("avatar.png").exists());
    let served = server.get(&avatar).await;
    assert_eq!(served.status(), 200);

    let cursor = assert_ok!(client.upload_cursor(Upload::new("hand.cur", b"cur".to_vec())).await);
    let doc = client.fetch_document().await.unwrap();
    assert_eq!(doc.profile.avatar.as_deref(), Some(avatar.as_str()));
    assert_eq!(doc.theme.cursor, Cursor::Custom { url: cursor });

    let err = assert_err!(client.upload_background(Upload::new("bg.tiff", b"tiff".to_vec())).await);
    assert_eq!(rejected_status(err), 400);
}

#[tokio::test]
async fn password_change_takes_effect() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let err = assert_err!(client.change_password(PASSWORD, "123").await);
    assert_eq!(rejected_status(err), 400);
    assert_ok!(client.change_password(PASSWORD, "new-secret").await);

    let fresh = server.client();
    assert_err!(fresh.login(PASSWORD).await);
    assert_ok!(fresh.login("new-secret").await);
}

#[tokio::test]
async fn visits_are_counted_with_forwarded_ip() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();
    for _ in 0..2 {
        let response = http
            .get(format!("{}/", server.url))
            .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let stats = server.admin().await.fetch_stats().await.unwrap();
    assert_eq!(stats.visits, 2);
    assert_eq!(stats.visitor_logs[1].ip, "203.0.113.9");
    assert!(stats.last_visit.is_some());
}

#[tokio::test]
async fn admin_theme_has_defaults() {
    let server = TestServer::start().await;
    let client = server.admin().await;

    let theme = client.fetch_admin_theme().await.unwrap();
    assert_eq!(theme.primary_color, "#6366f1");

    let updated = assert_ok!(
        client
            .save_admin_theme(&folio_server::models::AdminTheme {
                primary_color: "#000000".into(),
                ..theme
            })
            .await
    );
    assert_eq!(updated.primary_color, "#000000");
    assert_eq!(updated.sidebar_bg, "#1f2937");
}
