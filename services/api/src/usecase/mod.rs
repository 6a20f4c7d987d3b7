pub mod access;
pub mod activation;
pub mod admin;
pub mod application;
pub mod approval;
pub mod bursary;
pub mod caller;
pub mod login;
pub mod profile;
pub mod registration;
pub mod saga;
