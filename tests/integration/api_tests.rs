//! End-to-end tests against a running server
//!
//! Needs a migrated database with at least one book:
//! `cargo test --test api_tests -- --ignored`

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Id of the first book offered by the create form
async fn first_book_id(client: &Client) -> String {
    let body: Value = client
        .get(format!("{}/catalog/bookinstance/create", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    body["books"][0]["id"]
        .as_str()
        .expect("No book in catalog")
        .to_string()
}

fn location(response: &reqwest::Response) -> String {
    response.headers()["location"]
        .to_str()
        .expect("Invalid location header")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_copies() {
    let response = client()
        .get(format!("{}/catalog/bookinstances", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Book Instance List");
    assert!(body["bookinstance_list"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_update_and_delete_copy() {
    let client = client();
    let book = first_book_id(&client).await;

    // Create
    let response = client
        .post(format!("{}/catalog/bookinstance/create", BASE_URL))
        .form(&[
            ("book", book.as_str()),
            ("imprint", "First Edition, 2001"),
            ("status", "Available"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
    let copy_url = location(&response);
    assert!(copy_url.starts_with("/catalog/bookinstance/"));
    let id = copy_url.trim_start_matches("/catalog/bookinstance/").to_string();

    // Detail
    let body: Value = client
        .get(format!("{}{}", BASE_URL, copy_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["bookinstance"]["imprint"], "First Edition, 2001");
    assert!(body["bookinstance"]["due_back"].is_null());

    // Update
    let response = client
        .post(format!("{}{}/update", BASE_URL, copy_url))
        .form(&[
            ("book", book.as_str()),
            ("imprint", "First Edition, 2001"),
            ("status", "Loaned"),
            ("due_back", "2030-01-15"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), copy_url);

    // Delete
    let response = client
        .post(format!("{}{}/delete", BASE_URL, copy_url))
        .form(&[("instanceid", id.as_str())])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/bookinstances");

    // Gone
    let response = client
        .get(format!("{}{}", BASE_URL, copy_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_create_with_empty_imprint() {
    let client = client();
    let book = first_book_id(&client).await;

    let response = client
        .post(format!("{}/catalog/bookinstance/create", BASE_URL))
        .form(&[("book", book.as_str()), ("imprint", ""), ("status", "Available")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["msg"], "Imprint must not be empty.");
}

#[tokio::test]
#[ignore]
async fn test_update_form_unknown_copy() {
    let response = client()
        .get(format!(
            "{}/catalog/bookinstance/00000000-0000-0000-0000-000000000000/update",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book Instance not found");
}
