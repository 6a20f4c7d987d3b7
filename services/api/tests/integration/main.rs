mod activation_test;
mod admin_test;
mod application_test;
mod approval_test;
mod bursary_test;
mod login_test;
mod profile_test;
mod registration_test;
mod router_test;
