//! Role-gated blog routes

mod common;

use axum::http::StatusCode;
use common::{empty_request, get_request, json_request, MultipartForm, TestApp};
use scribe_db::BlogRepository;
use scribe_media::MAX_IMAGE_BYTES;
use serde_json::json;

fn blog_form(title: &str) -> MultipartForm {
    MultipartForm::new()
        .text("title", title)
        .text("category", "Rust")
        .text("about", "Ownership without tears, one borrow at a time.")
        .file("blogImage", "image/jpeg", b"jpeg bytes")
}

async fn create_blog(app: &TestApp, token: &str, title: &str) -> String {
    let res = app
        .send(blog_form(title).build_with_cookie("/api/blogs", Some(token)))
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.json);
    res.json["blog_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_admin_publishes_and_everyone_reads() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;
    let reader = app.register("reader@x.io", "user").await;

    let id = create_blog(&app, &admin, "First post").await;
    assert_eq!(app.media.len(), 3);

    let res = app.send(get_request("/api/blogs", Some(&reader))).await;
    assert_eq!(res.status, StatusCode::OK);
    let blogs = res.json.as_array().unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["title"], "First post");
    assert_eq!(blogs[0]["author_name"], "Test Person");
    assert!(blogs[0]["author_image"].as_str().unwrap().starts_with("https://"));

    let res = app
        .send(get_request(&format!("/api/blogs/{id}"), Some(&reader)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["id"], id);
    assert_eq!(res.json["category"], "Rust");
}

#[tokio::test]
async fn test_my_blogs_scoped_to_creator() {
    let app = TestApp::new();
    let first = app.register("one@x.io", "admin").await;
    let second = app.register("two@x.io", "admin").await;

    create_blog(&app, &first, "Mine").await;
    create_blog(&app, &second, "Theirs").await;

    let res = app.send(get_request("/api/blogs/mine", Some(&first))).await;
    assert_eq!(res.status, StatusCode::OK);
    let mine = res.json.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "Mine");
}

#[tokio::test]
async fn test_non_admin_cannot_write() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;
    let user = app.register("user@x.io", "user").await;
    let id = create_blog(&app, &admin, "Guarded").await;

    let res = app
        .send(blog_form("Nope").build_with_cookie("/api/blogs", Some(&user)))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error_code(), "FORBIDDEN");
    assert_eq!(
        res.json["error"]["message"],
        "role (user) is not authorized to access this resource"
    );

    let res = app.send(get_request("/api/blogs/mine", Some(&user))).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .send(json_request(
            "PUT",
            &format!("/api/blogs/{id}"),
            json!({"title": "Hijacked"}),
            Some(&user),
        ))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .send(empty_request("DELETE", &format!("/api/blogs/{id}"), Some(&user)))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    assert_eq!(app.blogs.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unauthenticated_requests() {
    let app = TestApp::new();

    let res = app.send(get_request("/api/blogs", None)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error_code(), "MISSING_TOKEN");

    let res = app.send(blog_form("Anon").build("/api/blogs")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(app.media.is_empty());
}

#[tokio::test]
async fn test_blog_lookup_errors() {
    let app = TestApp::new();
    let token = app.register("r@x.io", "user").await;

    let res = app
        .send(get_request("/api/blogs/not-a-uuid", Some(&token)))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json["error"]["message"], "Invalid blog id");

    let res = app
        .send(get_request(
            "/api/blogs/00000000-0000-4000-8000-000000000000",
            Some(&token),
        ))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json["error"]["message"], "Blog not found");
}

#[tokio::test]
async fn test_update_blog() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;
    let id = create_blog(&app, &admin, "Draft").await;
    let uri = format!("/api/blogs/{id}");

    let res = app
        .send(json_request("PUT", &uri, json!({"title": " Final "}), Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["title"], "Final");
    assert_eq!(res.json["category"], "Rust");

    let res = app
        .send(json_request("PUT", &uri, json!({}), Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .send(json_request("PUT", &uri, json!({"about": "  "}), Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .send(json_request(
            "PUT",
            "/api/blogs/00000000-0000-4000-8000-000000000000",
            json!({"title": "Ghost"}),
            Some(&admin),
        ))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_admin_may_edit() {
    let app = TestApp::new();
    let author = app.register("author@x.io", "admin").await;
    let editor = app.register("editor@x.io", "admin").await;
    let id = create_blog(&app, &author, "Shared").await;

    let res = app
        .send(json_request(
            "PUT",
            &format!("/api/blogs/{id}"),
            json!({"category": "Systems"}),
            Some(&editor),
        ))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["category"], "Systems");
}

#[tokio::test]
async fn test_delete_blog_removes_image() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;
    let id = create_blog(&app, &admin, "Ephemeral").await;
    assert_eq!(app.media.len(), 2);

    let blog = app.send(get_request(&format!("/api/blogs/{id}"), Some(&admin))).await;
    let storage_id = blog.json["image"]["storage_id"].as_str().unwrap().to_string();
    assert!(app.media.contains(&storage_id));

    let uri = format!("/api/blogs/{id}");
    let res = app.send(empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json["message"], "Blog deleted successfully");
    assert!(!app.media.contains(&storage_id));
    assert_eq!(app.media.len(), 1);

    let res = app.send(empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_survives_media_failure() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;
    let id = create_blog(&app, &admin, "Sticky image").await;

    app.media.set_failing(true);
    let res = app
        .send(empty_request("DELETE", &format!("/api/blogs/{id}"), Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(app.blogs.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_blog_validation() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;

    let no_image = MultipartForm::new()
        .text("title", "T")
        .text("category", "C")
        .text("about", "A")
        .build_with_cookie("/api/blogs", Some(&admin));
    let res = app.send(no_image).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_IMAGE");
    assert_eq!(res.json["error"]["message"], "blog image is required");

    let no_title = MultipartForm::new()
        .text("category", "C")
        .text("about", "A")
        .file("blogImage", "image/png", b"png")
        .build_with_cookie("/api/blogs", Some(&admin));
    let res = app.send(no_title).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "BAD_REQUEST");

    let oversized = vec![0u8; MAX_IMAGE_BYTES as usize + 1];
    let too_big = MultipartForm::new()
        .text("title", "T")
        .text("category", "C")
        .text("about", "A")
        .file("blogImage", "image/png", &oversized)
        .build_with_cookie("/api/blogs", Some(&admin));
    let res = app.send(too_big).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "INVALID_IMAGE");
    assert_eq!(res.json["error"]["message"], "image size exceeds the 5MB limit");

    // Only the admin's photo made it to the media host
    assert_eq!(app.media.len(), 1);
    assert!(app.blogs.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_blog_media_failure() {
    let app = TestApp::new();
    let admin = app.register("admin@x.io", "admin").await;
    app.media.set_failing(true);

    let res = app
        .send(blog_form("Offline").build_with_cookie("/api/blogs", Some(&admin)))
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.error_code(), "UPSTREAM_FAILURE");
    assert_eq!(res.json["error"]["message"], "error uploading image");
    assert!(app.blogs.list_all().await.unwrap().is_empty());
}
