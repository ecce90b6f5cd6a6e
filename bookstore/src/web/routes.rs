// bookstore/src/web/routes.rs

use crate::web::handlers::{auth_handlers, cart_handlers, checkout_handlers, order_handlers, shop_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/Shop")
        .route("", web::get().to(shop_handlers::list_categories_handler))
        .route(
          "/ShopByCategory/{id}",
          web::get().to(shop_handlers::shop_by_category_handler),
        )
        .route("/AddToCart", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/Cart", web::get().to(cart_handlers::view_cart_handler))
        .route(
          "/RemoveFromCart/{id}",
          web::get().to(cart_handlers::remove_from_cart_handler),
        )
        .route("/Checkout", web::get().to(checkout_handlers::checkout_form_handler))
        .route("/Checkout", web::post().to(checkout_handlers::submit_checkout_handler))
        .route("/Payment", web::get().to(checkout_handlers::start_payment_handler))
        .route("/SaveOrder", web::get().to(checkout_handlers::save_order_handler)),
    )
    .service(
      web::scope("/Account")
        .route("/Register", web::post().to(auth_handlers::register_handler))
        .route("/Login", web::post().to(auth_handlers::login_handler))
        .route("/Logout", web::post().to(auth_handlers::logout_handler)),
    )
    .service(
      web::scope("/Orders")
        .route("", web::get().to(order_handlers::list_orders_handler))
        .route("/Details/{id}", web::get().to(order_handlers::order_details_handler)),
    );
}
