use axum::{
    Router,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use bursary_core::health::{healthz, readyz};
use bursary_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{list_admins, list_roles, register_admin},
    application::{
        approve_application, approve_applications_bulk, create_application, get_application,
        list_my_applications, list_review_queue, reject_application, withdraw_application,
    },
    auth::{activate_admin, activate_student, login_admin, login_student, register_student},
    bursary::{create_bursary, get_bursary, list_bursaries, update_bursary},
    profile::{
        add_guardian, delete_emergency_contact, delete_sponsor, get_emergency_contact,
        get_institution, get_personal, get_sponsor, list_guardians, put_emergency_contact,
        put_institution, put_personal, put_sponsor, remove_guardian, update_guardian,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Students: registration, login, activation
        .route("/auth/students/register", post(register_student))
        .route("/auth/students/login", post(login_student))
        .route("/students/activate/{token}", get(activate_student))
        // Admins
        .route("/auth/admins/login", post(login_admin))
        .route("/admins", get(list_admins).post(register_admin))
        .route("/admins/activate/{token}", get(activate_admin))
        .route("/roles", get(list_roles))
        // Bursaries
        .route("/bursaries", get(list_bursaries).post(create_bursary))
        .route("/bursaries/{id}", get(get_bursary).put(update_bursary))
        // Student profile
        .route("/students/me/personal", get(get_personal).put(put_personal))
        .route(
            "/students/me/institution",
            get(get_institution).put(put_institution),
        )
        .route(
            "/students/me/sponsor",
            get(get_sponsor).put(put_sponsor).delete(delete_sponsor),
        )
        .route(
            "/students/me/emergency",
            get(get_emergency_contact)
                .put(put_emergency_contact)
                .delete(delete_emergency_contact),
        )
        .route(
            "/students/me/guardians",
            get(list_guardians).post(add_guardian),
        )
        .route(
            "/students/me/guardians/{id}",
            put(update_guardian).delete(remove_guardian),
        )
        .route("/students/me/applications", get(list_my_applications))
        // Applications
        .route(
            "/applications",
            get(list_review_queue)
                .post(create_application)
                .put(withdraw_application),
        )
        .route("/applications/{id}", get(get_application))
        // Approval pipeline
        .route("/approve", post(approve_application))
        .route("/approve/bulk", post(approve_applications_bulk))
        .route("/reject", post(reject_application))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
