//! Cookie-derived bearer tokens

/// Name of the cookie carrying the bearer credential.
pub const AUTH_COOKIE_NAME: &str = "authtoken";

/// Environment variable holding a raw cookie header for hosts without a browser.
pub const COOKIE_ENV_VAR: &str = "CFS_COOKIE";

const PAIR_SEPARATOR: &str = "; ";

/// Read the value of cookie `name` from a raw `name=value; name=value` header.
///
/// The first entry whose prefix is `name=` wins and everything after its first
/// `=` is returned untouched (no decoding, no trimming). A missing cookie or an
/// empty header is `None`, which is the normal pre-login state.
pub fn read_cookie(cookie_header: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);

    cookie_header
        .split(PAIR_SEPARATOR)
        .find(|entry| entry.starts_with(&prefix))
        .and_then(|entry| entry.split_once('='))
        .map(|(_, value)| value.to_string())
}

/// Source of a raw cookie header, read at call time.
pub trait CookieStore: Send + Sync {
    fn cookie_header(&self) -> String;
}

/// A fixed cookie header snapshot.
impl CookieStore for String {
    fn cookie_header(&self) -> String {
        self.clone()
    }
}

/// Anything that can hand out the current bearer token.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Lazily reads the auth cookie from a [`CookieStore`].
///
/// Nothing is cached: every [`token`](TokenSource::token) call re-reads the store,
/// so a login or logout in the store is visible on the next request.
#[derive(Debug, Clone)]
pub struct AuthTokenReader<S> {
    store: S,
    cookie_name: String,
}

impl<S: CookieStore> AuthTokenReader<S> {
    pub fn new(store: S) -> Self {
        Self::with_cookie_name(store, AUTH_COOKIE_NAME)
    }

    pub fn with_cookie_name(store: S, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: CookieStore> TokenSource for AuthTokenReader<S> {
    fn token(&self) -> Option<String> {
        // An empty value would produce a bare "Bearer " header
        read_cookie(&self.store.cookie_header(), &self.cookie_name).filter(|t| !t.is_empty())
    }
}
