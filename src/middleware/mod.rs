/*
 * Responsibility
 * - Router-level middleware
 * - auth: identity resolution gate for protected routes
 * - http: request id / trace / limits / deadline
 * - security_headers: fixed hardening header set
 */
pub mod auth;
pub mod http;
pub mod security_headers;
