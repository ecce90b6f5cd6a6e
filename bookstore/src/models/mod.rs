// bookstore/src/models/mod.rs

//! Data structures mirroring the relational tables, plus the draft order
//! that lives in session state before payment.

pub mod book;
pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_detail;
pub mod user;

pub use book::Book;
pub use cart_item::{CartItem, CartLine, CartSummary, MAX_LINE_QUANTITY};
pub use category::Category;
pub use order::{DraftLine, Order, OrderDraft, ShippingDetails};
pub use order_detail::{OrderDetail, OrderDetailLine};
pub use user::User;
