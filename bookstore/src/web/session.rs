// bookstore/src/web/session.rs

//! Session keys and the helpers that read and write them.

use crate::checkout::CheckoutStage;
use crate::errors::Result;
use crate::models::OrderDraft;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{time::Duration, Key};
use tracing::debug;
use uuid::Uuid;

pub const CUSTOMER_ID: &str = "CustomerId";
pub const USER_NAME: &str = "UserName";
pub const ITEM_COUNT: &str = "ItemCount";
pub const ORDER: &str = "Order";
pub const CHECKOUT_STATE: &str = "CheckoutState";

pub const SESSION_COOKIE_NAME: &str = "bookstore_session";

/// Encrypted cookie-backed sessions. The whole session, draft order
/// included, travels in the cookie.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
  SessionMiddleware::builder(CookieSessionStore::default(), key)
    .cookie_name(SESSION_COOKIE_NAME.to_string())
    .cookie_secure(secure)
    .cookie_http_only(true)
    .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(12)))
    .build()
}

/// The customer key for this visitor: the one already bound to the session,
/// else the signed-in principal, else a fresh anonymous token. Whatever is
/// returned is bound to the session.
pub fn resolve_customer_id(session: &Session) -> Result<String> {
  if let Some(existing) = session.get::<String>(CUSTOMER_ID)? {
    return Ok(existing);
  }
  let customer_id = match signed_in_user(session)? {
    Some(email) => email,
    None => Uuid::new_v4().to_string(),
  };
  debug!(%customer_id, "Binding new customer key to session.");
  session.insert(CUSTOMER_ID, &customer_id)?;
  Ok(customer_id)
}

pub fn signed_in_user(session: &Session) -> Result<Option<String>> {
  Ok(session.get::<String>(USER_NAME)?)
}

/// The anonymous customer key whose cart `email` adopts on sign-in. `None`
/// when someone is already signed in, since their cart belongs to them.
pub fn anonymous_customer_id(session: &Session, email: &str) -> Result<Option<String>> {
  if signed_in_user(session)?.is_some() {
    return Ok(None);
  }
  Ok(session.get::<String>(CUSTOMER_ID)?.filter(|key| key != email))
}

/// Marks `email` as signed in and makes it the customer key. A checkout
/// started by a different principal is dropped.
pub fn sign_in(session: &Session, email: &str) -> Result<()> {
  let previous = signed_in_user(session)?;
  session.renew();
  if previous.as_deref().is_some_and(|p| p != email) {
    debug!("Principal changed; dropping the previous checkout state.");
    clear_checkout(session);
  }
  session.insert(USER_NAME, email)?;
  session.insert(CUSTOMER_ID, email)?;
  Ok(())
}

pub fn store_item_count(session: &Session, item_count: i64) -> Result<()> {
  session.insert(ITEM_COUNT, item_count)?;
  Ok(())
}

pub fn checkout_stage(session: &Session) -> Result<CheckoutStage> {
  Ok(session.get::<CheckoutStage>(CHECKOUT_STATE)?.unwrap_or_default())
}

/// The draft order, only while the stage says one exists.
pub fn load_draft(session: &Session) -> Result<Option<OrderDraft>> {
  if !checkout_stage(session)?.has_draft() {
    return Ok(None);
  }
  Ok(session.get::<OrderDraft>(ORDER)?)
}

pub fn store_draft(session: &Session, draft: &OrderDraft, stage: CheckoutStage) -> Result<()> {
  session.insert(ORDER, draft)?;
  session.insert(CHECKOUT_STATE, stage)?;
  Ok(())
}

/// Drops every checkout key once the order is persisted.
pub fn clear_checkout(session: &Session) {
  session.remove(ORDER);
  session.remove(CHECKOUT_STATE);
  session.remove(ITEM_COUNT);
}
