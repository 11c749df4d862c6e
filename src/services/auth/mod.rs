pub mod certificate;
pub mod cookie;
pub mod identity;
pub mod login;
pub mod redirect;
pub mod resolver;
pub mod token;

pub use certificate::ClientCertChain;
pub use identity::{HeaderIdentityExtractor, IdentityError, IdentityExtractor, UserInfo};
pub use login::{LoginError, LoginService};
pub use resolver::{LOGIN_PATH, Resolution, SessionError};
