//! API routes.

pub mod batch;
pub mod cart;
pub mod health;
pub mod sessions;

pub use batch::{BatchItemResult, BatchRequest, BatchResponse, batch_handler};
pub use cart::{
    AddItemRequest, BulkUpdateRequest, CartResponse, SetQuantityRequest, add_item_handler,
    bulk_update_handler, calculate_handler, clear_cart_handler, get_cart_handler,
    remove_item_handler, set_quantity_handler,
};
pub use health::health_routes;
pub use sessions::{
    ListSessionsResponse, SessionSummary, SweepResponse, delete_session_handler,
    get_session_handler, list_sessions_handler, sweep_sessions_handler,
};
