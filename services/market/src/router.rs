use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::trace::TraceLayer;

use bazaar_core::health::healthz;
use bazaar_core::middleware::{X_REQUEST_ID, request_id_layer};

use crate::handlers::{admin, auth, chat, health::readyz, product, ticket, user};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/otp", post(auth::send_otp))
        .route("/auth/otp/verify", post(auth::verify_otp))
        .route("/auth/session", delete(auth::sign_out))
        // Users
        .route(
            "/users/@me",
            get(user::get_me)
                .patch(user::update_me)
                .delete(user::delete_me),
        )
        .route("/users/@me/phone/otp", post(user::request_phone_change))
        .route("/users/@me/phone", post(user::change_phone))
        .route("/users/@me/favorites", get(user::list_favorites))
        .route("/users/@me/payments", get(user::list_payments))
        // Products
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product)
                .patch(product::update_product)
                .delete(product::delete_product),
        )
        .route("/products/{id}/favorite", post(product::toggle_favorite))
        .route("/products/{id}/reports", post(product::report_product))
        .route("/products/{id}/chats", post(product::open_chat))
        // Chats
        .route("/chats", get(chat::list_chats))
        .route(
            "/chats/{id}/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        // Tickets
        .route(
            "/tickets",
            get(ticket::list_my_tickets).post(ticket::create_ticket),
        )
        .route("/tickets/{id}", get(ticket::get_ticket))
        .route("/tickets/{id}/replies", post(ticket::reply_ticket))
        // Admin
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/bulk", post(admin::bulk_users))
        .route("/admin/sellers/{id}/review", post(admin::review_seller))
        .route("/admin/products", get(admin::list_products))
        .route("/admin/products/bulk", post(admin::bulk_products))
        .route("/admin/reports", get(admin::list_reports))
        .route("/admin/tickets", get(admin::list_tickets))
        .route("/admin/tickets/{id}", patch(admin::set_ticket_status))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(
                    axum::http::HeaderName::from_static(X_REQUEST_ID),
                )),
        )
        .with_state(state)
}
