//! Integration tests for FoodieEats.
//!
//! # Running Tests
//!
//! ```bash
//! # Start MongoDB
//! docker run -d -p 27017:27017 mongo:7
//!
//! # Start the API server
//! cargo run -p foodie-eats-api
//!
//! # Run integration tests
//! cargo test -p foodie-eats-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `user_engagement` - Accounts, posts, comments, and like ledgers
//! - `follow_graph` - Follow toggles and follower/following symmetry
//! - `owner_restaurants` - Owner signup, menus, and rating aggregation
//!
//! All tests talk to a running server over HTTP; set `FOODIE_API_BASE_URL`
//! to point somewhere other than `http://localhost:3000`.
