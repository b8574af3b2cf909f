//! Cookie persistence across calls

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use http::HeaderValue;

mod utils;

pub(crate) use utils::{add_cookie_header, store_response_cookies};

/// Session storage consulted by the client on every request.
pub trait CookieStore: Send + Sync {
    /// Store the Set-Cookie header values received from `url`.
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url);
    /// Cookie header value to send to `url`, if any.
    fn cookies(&self, url: &url::Url) -> Option<HeaderValue>;
}

/// Default in-memory `CookieStore`, shareable between clients.
#[derive(Default, Clone)]
pub struct Jar(Arc<RwLock<cookie_store::CookieStore>>);

impl Jar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie in `Set-Cookie` syntax as if `url` had sent it.
    pub fn add_cookie_str(&self, cookie: &str, url: &url::Url) {
        let cookies = cookie::Cookie::parse(cookie)
            .ok()
            .map(cookie::Cookie::into_owned)
            .into_iter();
        self.write().store_response_cookies(cookies, url);
    }

    fn read(&self) -> RwLockReadGuard<'_, cookie_store::CookieStore> {
        self.0.read().unwrap_or_else(|poisoned| {
            tracing::warn!("cookie jar lock poisoned; reading its current contents");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, cookie_store::CookieStore> {
        self.0.write().unwrap_or_else(|poisoned| {
            tracing::warn!("cookie jar lock poisoned; updating its current contents");
            poisoned.into_inner()
        })
    }
}

impl CookieStore for Jar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url) {
        let cookies: Vec<_> = cookie_headers
            .filter_map(|val| val.to_str().ok())
            .filter_map(|val| cookie::Cookie::parse(val).map(cookie::Cookie::into_owned).ok())
            .collect();

        self.write().store_response_cookies(cookies.into_iter(), url);
    }

    fn cookies(&self, url: &url::Url) -> Option<HeaderValue> {
        let store = self.read();
        let s = store
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");

        if s.is_empty() {
            return None;
        }

        HeaderValue::from_maybe_shared(Bytes::from(s)).ok()
    }
}

impl fmt::Debug for Jar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jar").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_cookies_are_sent_back() {
        let jar = Jar::new();
        let url: url::Url = "http://api.local/v1/pets".parse().unwrap();
        let set = [HeaderValue::from_static("session=abc; Path=/")];
        jar.set_cookies(&mut set.iter(), &url);

        assert_eq!(jar.cookies(&url).unwrap(), "session=abc");
    }

    #[test]
    fn empty_jar_sends_nothing() {
        let url: url::Url = "http://api.local/".parse().unwrap();
        assert!(Jar::new().cookies(&url).is_none());
    }

    #[test]
    fn cookies_are_scoped_to_their_domain() {
        let jar = Jar::new();
        jar.add_cookie_str("k=v; Domain=one.local", &"http://one.local/".parse().unwrap());
        assert!(jar.cookies(&"http://two.local/".parse().unwrap()).is_none());
    }

    #[test]
    fn poisoned_jar_keeps_working() {
        let jar = Jar::new();
        let url: url::Url = "http://api.local/".parse().unwrap();
        let shared = jar.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.0.write().unwrap();
            panic!("poison the jar");
        })
        .join();
        assert!(jar.0.is_poisoned());

        jar.add_cookie_str("session=abc", &url);
        assert_eq!(jar.cookies(&url).unwrap(), "session=abc");
    }
}
