/*
 * Responsibility
 * - Transport-free building blocks (tokens, sessions, identity decisions)
 * - HTTP handlers and middleware call into these; nothing here builds a Response
 */
pub mod auth;
pub mod session;
