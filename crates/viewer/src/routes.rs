//! Route resolution for card addresses.
//!
//! - `/` and anything unmatched redirect to `/card/demo`
//! - `/card/{id}` shows the card for `id` (`demo` maps to the demo record)
//! - `/card` with no identifier shows the missing-identifier failure

/// Path every unmatched route redirects to.
pub const HOME_REDIRECT: &str = "/card/demo";

/// Alias resolved to the configured demo record.
pub const DEMO_ALIAS: &str = "demo";

const MAX_REDIRECTS: usize = 4;

/// Outcome of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Replace the current location with this path.
    Redirect(String),
    /// Show the card for this identifier (`None` when absent).
    Card(Option<String>),
}

/// Resolve a single path without following redirects.
///
/// A target that does not start with `/` is taken as a bare identifier.
#[must_use]
pub fn resolve(target: &str, demo_id: &str) -> Route {
    let target = target.trim();

    if !target.starts_with('/') {
        return if target.is_empty() {
            Route::Redirect(HOME_REDIRECT.to_string())
        } else {
            Route::Card(Some(expand_alias(target, demo_id)))
        };
    }

    // Query strings and fragments carry nothing for a card
    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let mut segments = path.split('/').skip(1);
    match (segments.next(), segments.next(), segments.next()) {
        (Some("card"), None, None) => Route::Card(None),
        (Some("card"), Some(id), None) => {
            let id = urlencoding::decode(id).map_or_else(|_| id.to_string(), |s| s.into_owned());
            if id.is_empty() {
                Route::Card(None)
            } else {
                Route::Card(Some(expand_alias(&id, demo_id)))
            }
        }
        _ => Route::Redirect(HOME_REDIRECT.to_string()),
    }
}

/// Resolve `target`, following redirects until a card route is reached.
///
/// Gives up after a few hops and lands on the missing-identifier route.
#[must_use]
pub fn follow(target: &str, demo_id: &str) -> Option<String> {
    let mut current = target.to_string();

    for _ in 0..=MAX_REDIRECTS {
        match resolve(&current, demo_id) {
            Route::Card(id) => return id,
            Route::Redirect(next) => {
                tracing::debug!(from = %current, to = %next, "Following redirect");
                current = next;
            }
        }
    }

    tracing::warn!(target, "Too many redirects");
    None
}

fn expand_alias(id: &str, demo_id: &str) -> String {
    if id == DEMO_ALIAS {
        demo_id.to_string()
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "QcsoVRnPirWZeFWgwm2Q";

    #[test]
    fn test_root_redirects_to_demo() {
        assert_eq!(resolve("/", DEMO), Route::Redirect("/card/demo".to_string()));
        assert_eq!(resolve("", DEMO), Route::Redirect("/card/demo".to_string()));
        assert_eq!(follow("/", DEMO), Some(DEMO.to_string()));
    }

    #[test]
    fn test_unmatched_paths_redirect() {
        for path in ["/about", "/card/a/b", "/cards/x", "/users/abc"] {
            assert_eq!(
                resolve(path, DEMO),
                Route::Redirect(HOME_REDIRECT.to_string()),
                "{path}"
            );
        }
    }

    #[test]
    fn test_card_routes() {
        assert_eq!(resolve("/card/abc123", DEMO), Route::Card(Some("abc123".to_string())));
        assert_eq!(resolve("/card/abc123/", DEMO), Route::Card(Some("abc123".to_string())));
        assert_eq!(resolve("/card/abc?ref=qr", DEMO), Route::Card(Some("abc".to_string())));
        assert_eq!(resolve("/card/demo", DEMO), Route::Card(Some(DEMO.to_string())));
        assert_eq!(
            resolve("/card/Jos%C3%A9", DEMO),
            Route::Card(Some("José".to_string()))
        );
    }

    #[test]
    fn test_card_without_identifier() {
        assert_eq!(resolve("/card", DEMO), Route::Card(None));
        assert_eq!(resolve("/card/", DEMO), Route::Card(None));
        assert_eq!(follow("/card/", DEMO), None);
    }

    #[test]
    fn test_bare_identifier() {
        assert_eq!(resolve("abc123", DEMO), Route::Card(Some("abc123".to_string())));
        assert_eq!(resolve("demo", DEMO), Route::Card(Some(DEMO.to_string())));
        assert_eq!(follow("abc123", DEMO), Some("abc123".to_string()));
    }
}
