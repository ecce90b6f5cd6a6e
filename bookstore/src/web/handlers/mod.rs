// bookstore/src/web/handlers/mod.rs

use actix_web::{http::header, HttpResponse};

pub mod auth_handlers;
pub mod cart_handlers;
pub mod checkout_handlers;
pub mod order_handlers;
pub mod shop_handlers;

/// 302, for plain navigation to a safe default view.
pub(crate) fn redirect_found(location: &str) -> HttpResponse {
  HttpResponse::Found().insert_header((header::LOCATION, location)).finish()
}

/// 303, after a form post or to hand off to another site.
pub(crate) fn redirect_see_other(location: &str) -> HttpResponse {
  HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}
