// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: DB/payment/mail adapters
// - presentation: HTTP handlers and routing
// - application: access policy, services and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
