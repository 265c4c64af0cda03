// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: file store and crypto adapters
// - presentation: HTTP handlers and routing
// - application: access policy, ports, and use cases
// - domain: core models and error taxonomy

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
