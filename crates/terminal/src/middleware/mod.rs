//! HTTP middleware stack for the till UI.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (`x-request-id`, generated and propagated by tower-http)
//! 4. Security headers (CSP, frame denial, no-store)

pub mod security_headers;

pub use security_headers::security_headers_middleware;
