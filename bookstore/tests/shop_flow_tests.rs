// bookstore/tests/shop_flow_tests.rs

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use bookstore::models::MAX_LINE_QUANTITY;
use common::*;
use serde_json::Value;

#[actix_web::test]
async fn health_endpoint_answers() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  let resp = send!(app, browser, TestRequest::get().uri("/health"));
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn index_lists_categories_by_name() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  let resp = send!(app, browser, TestRequest::get().uri("/Shop"));
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  let names: Vec<&str> = body["categories"]
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, vec!["Fantasy", "History", "Science Fiction"]);
}

#[actix_web::test]
async fn category_page_lists_only_its_books() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  let resp = send!(app, browser, TestRequest::get().uri("/Shop/ShopByCategory/2"));
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["category"], "History");
  let books = body["books"].as_array().unwrap();
  assert_eq!(books.len(), 2);
  assert!(books.iter().all(|b| b["category_id"] == 2));
}

#[actix_web::test]
async fn unknown_or_malformed_category_redirects_to_index() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  for uri in ["/Shop/ShopByCategory/999", "/Shop/ShopByCategory/not-a-number"] {
    let resp = send!(app, browser, TestRequest::get().uri(uri));
    assert_eq!(resp.status(), StatusCode::FOUND, "{}", uri);
    assert_eq!(location(&resp), "/Shop");
  }
}

#[actix_web::test]
async fn adding_the_same_book_twice_sums_quantities() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  let resp = send!(app, browser, add_to_cart_form(DUNE_ID, 1));
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/Shop/Cart");
  send!(app, browser, add_to_cart_form(DUNE_ID, 2));

  let resp = send!(app, browser, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  let lines = body["lines"].as_array().unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0]["book_id"], DUNE_ID);
  assert_eq!(lines[0]["quantity"], 3);
  assert_eq!(body["itemCount"], 3);
}

#[actix_web::test]
async fn cart_total_is_the_sum_of_its_lines() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  send!(app, browser, add_to_cart_form(HOBBIT_ID, 2));
  send!(app, browser, add_to_cart_form(SPQR_ID, 1));

  let resp = send!(app, browser, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  let lines_total: i64 = body["lines"]
    .as_array()
    .unwrap()
    .iter()
    .map(|l| l["quantity"].as_i64().unwrap() * l["price_cents"].as_i64().unwrap())
    .sum();
  assert_eq!(lines_total, 2 * HOBBIT_PRICE + SPQR_PRICE);
  assert_eq!(body["totalCents"], lines_total);
  assert_eq!(body["itemCount"], 3);
}

#[actix_web::test]
async fn unknown_book_is_not_found() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  let resp = send!(app, browser, add_to_cart_form(4242, 1));
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_positive_quantity_is_rejected() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  for quantity in [0, -3] {
    let resp = send!(app, browser, add_to_cart_form(DUNE_ID, quantity));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
  let resp = send!(app, browser, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  assert!(body["lines"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn line_quantity_is_capped() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  for quantity in [MAX_LINE_QUANTITY + 1, i32::MAX] {
    let resp = send!(app, browser, add_to_cart_form(DUNE_ID, quantity));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", quantity);
  }

  let resp = send!(app, browser, add_to_cart_form(DUNE_ID, MAX_LINE_QUANTITY));
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let resp = send!(app, browser, add_to_cart_form(DUNE_ID, 1));
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send!(app, browser, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["lines"][0]["quantity"], MAX_LINE_QUANTITY);
}

#[actix_web::test]
async fn visitors_do_not_share_carts() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut alice = Browser::new();
  let mut bob = Browser::new();

  send!(app, alice, add_to_cart_form(HOBBIT_ID, 1));

  let resp = send!(app, bob, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  assert!(body["lines"].as_array().unwrap().is_empty());
  assert_eq!(body["itemCount"], 0);
}

#[actix_web::test]
async fn removing_someone_elses_item_changes_nothing() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut alice = Browser::new();
  let mut bob = Browser::new();

  send!(app, alice, add_to_cart_form(HOBBIT_ID, 1));
  let resp = send!(app, alice, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  let item_id = body["lines"][0]["item_id"].as_i64().unwrap();

  let resp = send!(
    app,
    bob,
    TestRequest::get().uri(&format!("/Shop/RemoveFromCart/{}", item_id))
  );
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/Shop/Cart");

  let resp = send!(app, alice, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["lines"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn removing_own_item_empties_the_line() {
  let state = test_state().await;
  let app = init_app!(state);
  let mut browser = Browser::new();

  send!(app, browser, add_to_cart_form(HOBBIT_ID, 2));
  send!(app, browser, add_to_cart_form(DUNE_ID, 1));
  let resp = send!(app, browser, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  let hobbit_item = body["lines"]
    .as_array()
    .unwrap()
    .iter()
    .find(|l| l["book_id"] == HOBBIT_ID)
    .map(|l| l["item_id"].as_i64().unwrap())
    .unwrap();

  send!(
    app,
    browser,
    TestRequest::get().uri(&format!("/Shop/RemoveFromCart/{}", hobbit_item))
  );

  let resp = send!(app, browser, TestRequest::get().uri("/Shop/Cart"));
  let body: Value = test::read_body_json(resp).await;
  let lines = body["lines"].as_array().unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0]["book_id"], DUNE_ID);
  assert_eq!(body["totalCents"], DUNE_PRICE);
}
