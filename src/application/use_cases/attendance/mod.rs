pub mod create_service;
pub mod list_attendance;
pub mod list_services;
pub mod record_attendance;
