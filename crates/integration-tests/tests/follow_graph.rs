//! Integration tests for the follow graph.
//!
//! These tests require:
//! - A running MongoDB instance
//! - The API server running (cargo run -p foodie-eats-api)
//!
//! Run with: cargo test -p foodie-eats-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use foodie_eats_core::UserId;

/// Base URL for the API (configurable via environment).
fn base_url() -> String {
    std::env::var("FOODIE_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Test helper: sign up a fresh user, returning the user id and token.
async fn signup_user(client: &Client, tag: &str) -> (String, String) {
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
    let id = body["user"]["id"]
        .as_str()
        .expect("signup response missing user id")
        .to_string();
    let token = body["token"]
        .as_str()
        .expect("signup response missing token")
        .to_string();
    (id, token)
}

/// Test helper: fetch a user body.
async fn fetch_user(client: &Client, id: &str) -> Value {
    let resp = client
        .get(format!("{}/users/{id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch user");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse user")
}

fn contains(list: &Value, id: &str) -> bool {
    list.as_array()
        .is_some_and(|items| items.iter().any(|item| item == id))
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_follow_toggle_is_symmetric() {
    let client = Client::new();
    let base_url = base_url();
    let (follower_id, follower_token) = signup_user(&client, "follower").await;
    let (target_id, _target_token) = signup_user(&client, "target").await;

    let resp = client
        .post(format!("{base_url}/users/{target_id}/followers"))
        .bearer_auth(&follower_token)
        .send()
        .await
        .expect("Failed to follow");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse follow response");
    assert_eq!(body["following"], true);

    // Both sides of the graph agree
    let target = fetch_user(&client, &target_id).await;
    let follower = fetch_user(&client, &follower_id).await;
    assert!(contains(&target["followers"], &follower_id));
    assert!(contains(&follower["following"], &target_id));

    // Second toggle unfollows and clears both sides
    let resp = client
        .post(format!("{base_url}/users/{target_id}/followers"))
        .bearer_auth(&follower_token)
        .send()
        .await
        .expect("Failed to unfollow");
    let body: Value = resp.json().await.expect("Failed to parse unfollow response");
    assert_eq!(body["following"], false);

    let target = fetch_user(&client, &target_id).await;
    let follower = fetch_user(&client, &follower_id).await;
    assert!(!contains(&target["followers"], &follower_id));
    assert!(!contains(&follower["following"], &target_id));
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_delete_route_toggles_too() {
    let client = Client::new();
    let base_url = base_url();
    let (_follower_id, follower_token) = signup_user(&client, "deltoggle").await;
    let (target_id, _target_token) = signup_user(&client, "deltarget").await;

    // POST engages, DELETE disengages; same toggle either way
    let resp = client
        .post(format!("{base_url}/users/{target_id}/followers"))
        .bearer_auth(&follower_token)
        .send()
        .await
        .expect("Failed to follow");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["following"], true);

    let resp = client
        .delete(format!("{base_url}/users/{target_id}/followers"))
        .bearer_auth(&follower_token)
        .send()
        .await
        .expect("Failed to unfollow");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["following"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_self_follow_is_rejected() {
    let client = Client::new();
    let (id, token) = signup_user(&client, "selfie").await;

    let resp = client
        .post(format!("{}/users/{id}/followers", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to attempt self-follow");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_follow_unknown_user_is_not_found() {
    let client = Client::new();
    let (_id, token) = signup_user(&client, "ghosthunt").await;
    let ghost = UserId::generate().to_hex();

    let resp = client
        .post(format!("{}/users/{ghost}/followers", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to attempt follow");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and MongoDB"]
async fn test_feed_shows_followed_users_posts_newest_first() {
    let client = Client::new();
    let base_url = base_url();
    let (reader_id, reader_token) = signup_user(&client, "reader").await;
    let (author_id, author_token) = signup_user(&client, "writer").await;

    client
        .post(format!("{base_url}/users/{author_id}/followers"))
        .bearer_auth(&reader_token)
        .send()
        .await
        .expect("Failed to follow");

    for title in ["first post", "second post"] {
        let resp = client
            .post(format!("{base_url}/posts"))
            .bearer_auth(&author_token)
            .json(&json!({
                "restaurant_id": foodie_eats_core::RestaurantId::generate().to_hex(),
                "dish_id": foodie_eats_core::DishId::generate().to_hex(),
                "title": title,
                "rating": 5,
            }))
            .send()
            .await
            .expect("Failed to create post");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{base_url}/posts/{reader_id}/following"))
        .send()
        .await
        .expect("Failed to fetch feed");
    assert_eq!(resp.status(), StatusCode::OK);
    let feed: Value = resp.json().await.expect("Failed to parse feed");
    let posts = feed.as_array().expect("feed is not an array");
    assert!(posts.len() >= 2);
    assert_eq!(posts[0]["title"], "second post");
    assert_eq!(posts[1]["title"], "first post");
}
