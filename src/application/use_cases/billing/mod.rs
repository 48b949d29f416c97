pub mod apply_webhook;
pub mod get_subscription;
pub mod start_checkout;
