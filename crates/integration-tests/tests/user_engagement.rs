//! Integration tests for accounts, posts, comments, and like ledgers.
//!
//! These tests require:
//! - A running MongoDB instance
//! - The API server running (cargo run -p foodie-eats-api)
//!
//! Run with: cargo test -p foodie-eats-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use foodie_eats_core::{DishId, RestaurantId, UserId};

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("FOODIE_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Test helper: sign up a fresh user, returning the response body and token.
async fn signup_user(client: &Client, tag: &str) -> (Value, String) {
    let suffix = UserId::generate().to_hex();
    let resp = client
        .post(format!("{}/users/signup", base_url()))
        .json(&json!({
            "name": format!("Test {tag}"),
            "username": format!("{tag}{}", &suffix[..10]),
            "email": format!("{tag}-{suffix}@example.com"),
            "password": "integration-pass-123",
        }))
        .send()
        .await
        .expect("Failed to sign up test user");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse signup response");
    let token = body["token"]
        .as_str()
        .expect("signup response missing token")
        .to_string();
    (body["user"].clone(), token)
}

/// Test helper: create a post as the given user.
async fn create_post(client: &Client, token: &str, title: &str) -> Value {
    let resp = client
        .post(format!("{}/posts", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "restaurant_id": RestaurantId::generate().to_hex(),
            "dish_id": DishId::generate().to_hex(),
            "title": title,
            "description": "created by integration test",
            "rating": 4,
        }))
        .send()
        .await
        .expect("Failed to create post");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse post response")
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_signup_returns_user_and_token_without_hash() {
    let client = Client::new();
    let (user, token) = signup_user(&client, "signup").await;

    assert!(!token.is_empty());
    assert!(user["id"].as_str().is_some());

    // Fetch the profile back; the hash must never appear anywhere
    let resp = client
        .get(format!("{}/users/{}", base_url(), user["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to fetch user");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(!body.contains("password_hash"));
    assert!(!body.contains("argon2"));
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_login_with_wrong_password_is_unauthorized() {
    let client = Client::new();
    let (user, _token) = signup_user(&client, "login").await;

    let resp = client
        .post(format!("{}/users/login", base_url()))
        .json(&json!({
            "email": user["email"],
            "password": "definitely-not-the-password",
        }))
        .send()
        .await
        .expect("Failed to attempt login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_unauthenticated_post_is_rejected() {
    let client = Client::new();
    let resp = client
        .post(format!("{}/posts", base_url()))
        .json(&json!({
            "restaurant_id": RestaurantId::generate().to_hex(),
            "dish_id": DishId::generate().to_hex(),
            "title": "no token",
            "rating": 3,
        }))
        .send()
        .await
        .expect("Failed to attempt post");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_post_comment_like_lifecycle() {
    let client = Client::new();
    let base_url = base_url();
    let (_user, token) = signup_user(&client, "poster").await;

    let post = create_post(&client, &token, "Lifecycle ramen").await;
    let post_id = post["id"].as_str().expect("post missing id");
    assert_eq!(post["num_likes"], 0);
    assert_eq!(post["num_comments"], 0);

    // Like, then unlike; the counter must move by exactly one each way
    let resp = client
        .post(format!("{base_url}/posts/{post_id}/like"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to like post");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse like response");
    assert_eq!(body["liked"], true);
    assert_eq!(body["num_likes"], 1);

    let resp = client
        .post(format!("{base_url}/posts/{post_id}/like"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to unlike post");
    let body: Value = resp.json().await.expect("Failed to parse unlike response");
    assert_eq!(body["liked"], false);
    assert_eq!(body["num_likes"], 0);

    // Comment; the post's counter follows
    let resp = client
        .post(format!("{base_url}/posts/{post_id}/comments"))
        .bearer_auth(&token)
        .json(&json!({ "text": "looks delicious" }))
        .send()
        .await
        .expect("Failed to create comment");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = resp.json().await.expect("Failed to parse comment");
    let comment_id = comment["id"].as_str().expect("comment missing id");

    let resp = client
        .get(format!("{base_url}/posts/{post_id}"))
        .send()
        .await
        .expect("Failed to refetch post");
    let body: Value = resp.json().await.expect("Failed to parse post");
    assert_eq!(body["num_comments"], 1);

    // Delete the comment; the counter drops back to zero
    let resp = client
        .delete(format!("{base_url}/posts/{post_id}/comments/{comment_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete comment");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/posts/{post_id}"))
        .send()
        .await
        .expect("Failed to refetch post");
    let body: Value = resp.json().await.expect("Failed to parse post");
    assert_eq!(body["num_comments"], 0);

    // Delete the post
    let resp = client
        .delete(format!("{base_url}/posts/{post_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete post");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/posts/{post_id}"))
        .send()
        .await
        .expect("Failed to refetch deleted post");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_only_the_author_can_delete_a_post() {
    let client = Client::new();
    let base_url = base_url();
    let (_author, author_token) = signup_user(&client, "author").await;
    let (_other, other_token) = signup_user(&client, "other").await;

    let post = create_post(&client, &author_token, "Protected post").await;
    let post_id = post["id"].as_str().expect("post missing id");

    let resp = client
        .delete(format!("{base_url}/posts/{post_id}"))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Failed to attempt delete");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The post is untouched
    let resp = client
        .get(format!("{base_url}/posts/{post_id}"))
        .send()
        .await
        .expect("Failed to refetch post");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_post_delete_cascades_comments() {
    let client = Client::new();
    let base_url = base_url();
    let (_user, token) = signup_user(&client, "cascade").await;

    let post = create_post(&client, &token, "Doomed post").await;
    let post_id = post["id"].as_str().expect("post missing id");

    let resp = client
        .post(format!("{base_url}/posts/{post_id}/comments"))
        .bearer_auth(&token)
        .json(&json!({ "text": "doomed comment" }))
        .send()
        .await
        .expect("Failed to create comment");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .delete(format!("{base_url}/posts/{post_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete post");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Comments went with the post
    let resp = client
        .get(format!("{base_url}/posts/{post_id}/comments"))
        .send()
        .await
        .expect("Failed to list comments");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_deleted_account_cannot_like_a_comment() {
    let client = Client::new();
    let base_url = base_url();
    let (_author, author_token) = signup_user(&client, "cauthor").await;
    let (ghost, ghost_token) = signup_user(&client, "ghost").await;
    let ghost_id = ghost["id"].as_str().expect("user missing id");

    let post = create_post(&client, &author_token, "Haunted post").await;
    let post_id = post["id"].as_str().expect("post missing id");

    let resp = client
        .post(format!("{base_url}/posts/{post_id}/comments"))
        .bearer_auth(&author_token)
        .json(&json!({ "text": "still here" }))
        .send()
        .await
        .expect("Failed to create comment");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = resp.json().await.expect("Failed to parse comment");
    let comment_id = comment["id"].as_str().expect("comment missing id");

    // The second account deletes itself
    let resp = client
        .delete(format!("{base_url}/users/{ghost_id}"))
        .bearer_auth(&ghost_token)
        .send()
        .await
        .expect("Failed to delete account");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Its old token must not write into the comment's like ledger
    let resp = client
        .post(format!("{base_url}/comments/{comment_id}/like"))
        .bearer_auth(&ghost_token)
        .send()
        .await
        .expect("Failed to attempt like");
    let status = resp.status();
    assert!(
        status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND,
        "deleted account liked a comment: {status}"
    );

    let resp = client
        .get(format!("{base_url}/posts/{post_id}/comments"))
        .send()
        .await
        .expect("Failed to list comments");
    let comments: Value = resp.json().await.expect("Failed to parse comments");
    assert_eq!(comments[0]["num_likes"], 0);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_logout_revokes_the_token() {
    let client = Client::new();
    let base_url = base_url();
    let (user, token) = signup_user(&client, "logout").await;
    let user_id = user["id"].as_str().expect("user missing id");

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The token no longer authenticates
    let resp = client
        .put(format!("{base_url}/users/{user_id}"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await
        .expect("Failed to attempt update");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
