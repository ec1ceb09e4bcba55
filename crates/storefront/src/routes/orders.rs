//! Order submission route handler.
//!
//! One handler owns the whole workflow: persist the typed form, run the
//! validation gate, arm the double-submit guard, POST to the pharmacy
//! backend, and surface the outcome as a notice fragment. A successful order
//! deliberately leaves the cart and form untouched - the backend is the
//! system of record and the visitor keeps what they typed.

use apteka_core::checkout::{project_order, validate_order};
use apteka_core::{CustomerInfo, Submission};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session::keys;
use crate::pharmacy::OrderRequest;
use crate::routes::cart::load_cart;
use crate::state::AppState;

/// Order notice fragment template (success or failure banner).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_notice.html")]
pub struct OrderNoticeTemplate {
    pub success: bool,
    pub message: String,
}

fn notice(status: StatusCode, success: bool, message: impl Into<String>) -> Response {
    (
        status,
        OrderNoticeTemplate {
            success,
            message: message.into(),
        },
    )
        .into_response()
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_submission(session: &Session) -> Submission {
    session
        .get::<Submission>(keys::SUBMISSION)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn save_submission(
    session: &Session,
    submission: &Submission,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::SUBMISSION, submission).await
}

/// Submit the order.
///
/// The validation gate runs before anything else: a blank field or an empty
/// cart aborts locally with a notice and no state change, and the backend is
/// never contacted. Past the gate, the submission state machine rejects a
/// second click while the first request is still in flight.
#[instrument(skip(state, session, form), fields(name = %form.name))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerInfo>,
) -> Response {
    // Keep whatever the visitor typed, valid or not, so the form survives
    // page reloads.
    if let Err(e) = session.insert(keys::CUSTOMER_INFO, &form).await {
        tracing::error!("failed to save customer info to session: {e}");
    }

    let cart = load_cart(&session).await;

    // Validation gate: abort locally, no network call, nothing mutated.
    if let Err(rejection) = validate_order(&form, &cart) {
        return notice(
            StatusCode::UNPROCESSABLE_ENTITY,
            false,
            rejection.to_string(),
        );
    }

    // Double-submit guard.
    let mut submission = load_submission(&session).await;
    if let Err(in_flight) = submission.begin() {
        return notice(StatusCode::CONFLICT, false, in_flight.to_string());
    }
    if let Err(e) = save_submission(&session, &submission).await {
        tracing::error!("failed to save submission state to session: {e}");
    }

    let order = OrderRequest::new(form, project_order(&cart));

    match state.pharmacy().submit_order(&order).await {
        Ok(()) => {
            if let Err(e) = submission.complete() {
                tracing::warn!("submission state out of sync: {e}");
            }
            if let Err(e) = save_submission(&session, &submission).await {
                tracing::error!("failed to save submission state to session: {e}");
            }

            notice(StatusCode::OK, true, "Order successfully submitted")
        }
        Err(e) => {
            tracing::error!("failed to submit order: {e}");
            if let Err(e) = submission.fail() {
                tracing::warn!("submission state out of sync: {e}");
            }
            if let Err(e) = save_submission(&session, &submission).await {
                tracing::error!("failed to save submission state to session: {e}");
            }

            notice(
                StatusCode::BAD_GATEWAY,
                false,
                "Failed to submit order, please try again",
            )
        }
    }
}
