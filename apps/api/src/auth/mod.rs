// Accounts and bearer tokens: argon2 password hashes, HS256 JWTs, and the
// `AuthUser` extractor that guards every resume route.

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod store;

pub use extractor::AuthUser;
pub use jwt::TokenIssuer;
pub use store::{PgUserStore, UserStore};
