//! Shared types for the Chandler cart service.
//!
//! This crate holds the vocabulary the other crates speak: identifier
//! newtypes, money and totals, the ordered cart-contents model, the typed
//! command schema validated at the REST boundary, and the notify-only
//! observer system invoked around cart mutations.

pub mod cart;
pub mod command;
pub mod keys;
pub mod money;
pub mod observer;

pub use cart::{CartContents, LineItem, line_key};
pub use command::{CartCommand, QuantityUpdate};
pub use keys::{CustomerId, ProductId, SessionKey};
pub use money::{Money, Totals};
pub use observer::{CartEvent, CartObserver, CartOperation, DeleteReason, ObserverSet};
