//! Header plumbing between a `CookieStore` and HTTP messages

use http::HeaderMap;
use http::header::{COOKIE, SET_COOKIE};

use super::CookieStore;

pub(crate) fn add_cookie_header(headers: &mut HeaderMap, cookie_store: &dyn CookieStore, url: &url::Url) {
    if headers.contains_key(COOKIE) {
        return;
    }
    if let Some(header) = cookie_store.cookies(url) {
        headers.insert(COOKIE, header);
    }
}

pub(crate) fn store_response_cookies(headers: &HeaderMap, cookie_store: &dyn CookieStore, url: &url::Url) {
    let mut set_cookies = headers.get_all(SET_COOKIE).iter().peekable();
    if set_cookies.peek().is_some() {
        cookie_store.set_cookies(&mut set_cookies, url);
    }
}
