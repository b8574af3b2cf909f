//! URI scheme selection for outgoing requests

pub const HTTP: &str = "http";
pub const HTTPS: &str = "https";

/// Choose one scheme from a candidate list.
///
/// `https` wins whenever it appears anywhere in the list; otherwise the
/// first entry is kept. An empty list yields `None`.
pub fn select_scheme<S: AsRef<str>>(schemes: &[S]) -> Option<&str> {
    let first = schemes.first()?.as_ref();
    if first != HTTPS && schemes.len() > 1 {
        if let Some(https) = schemes.iter().map(AsRef::as_ref).find(|s| *s == HTTPS) {
            return Some(https);
        }
    }
    Some(first)
}

/// Choose the scheme for a request.
///
/// The runtime's own list takes priority over the operation's, so a runtime
/// configured with explicit schemes overrides whatever the operation declares.
/// Falls back to `http` when both lists are empty.
pub fn pick_scheme<'a, R, O>(runtime_schemes: &'a [R], operation_schemes: &'a [O]) -> &'a str
where
    R: AsRef<str>,
    O: AsRef<str>,
{
    select_scheme(runtime_schemes)
        .or_else(|| select_scheme(operation_schemes))
        .unwrap_or(HTTP)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn empty_list_selects_nothing() {
        assert_eq!(select_scheme(&NONE), None);
    }

    #[test]
    fn https_is_preferred_anywhere_in_list() {
        assert_eq!(select_scheme(&["http", "https"]), Some("https"));
        assert_eq!(select_scheme(&["ws", "http", "https"]), Some("https"));
        assert_eq!(select_scheme(&["https", "http"]), Some("https"));
    }

    #[test]
    fn first_entry_kept_without_https() {
        assert_eq!(select_scheme(&["http"]), Some("http"));
        assert_eq!(select_scheme(&["ws", "http"]), Some("ws"));
    }

    #[test]
    fn selection_matches_membership_over_many_lists() {
        let pool = ["http", "https", "ws", "wss"];
        for a in pool {
            for b in pool {
                for c in pool {
                    let list = [a, b, c];
                    let picked = select_scheme(&list);
                    if list.contains(&HTTPS) {
                        assert_eq!(picked, Some(HTTPS), "{list:?}");
                    } else {
                        assert_eq!(picked, Some(list[0]), "{list:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn runtime_schemes_override_operation() {
        assert_eq!(pick_scheme(&["http"], &["https"]), "http");
        assert_eq!(pick_scheme(&["https"], &["http"]), "https");
    }

    #[test]
    fn operation_schemes_used_when_runtime_has_none() {
        assert_eq!(pick_scheme(&NONE, &["http", "https"]), "https");
    }

    #[test]
    fn defaults_to_http() {
        assert_eq!(pick_scheme(&NONE, &NONE), "http");
    }
}
