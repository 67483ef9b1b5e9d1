pub mod cli;
pub mod client;
pub mod config;
pub mod cookie;
pub mod error;
pub mod routes;
pub mod token;

pub use client::{CfsSessionClient, ConfigSession};
pub use cookie::{read_cookie, AuthTokenReader, CookieStore, TokenSource, AUTH_COOKIE_NAME};
pub use error::{FetchError, FetchErrorKind, TokenError};
