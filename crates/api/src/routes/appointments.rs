use axum::{
    Router, middleware,
    routing::get,
};
use std::sync::Arc;

use crate::{ApiState, handlers, middleware::auth};

pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/appointments",
            get(handlers::appointments::list_availability)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/appointments/trainer/:trainer_id",
            get(handlers::appointments::list_trainer_appointments),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_service_token,
        ))
}
