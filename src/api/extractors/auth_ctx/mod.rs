/*!
 * Authentication context extractor
 *
 * Public API:
 * - AuthCtx / AuthMethod
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::{AuthCtx, AuthMethod};
