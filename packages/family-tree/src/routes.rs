//! Route definitions and navigation guards

#[cfg(feature = "web")]
use dioxus::prelude::*;

#[cfg(feature = "web")]
use crate::components::RouteGuard;
#[cfg(feature = "web")]
use crate::pages::{Admin, Home, Login, MemberDetail};

/// All application routes
#[cfg(feature = "web")]
#[derive(Clone, Debug, PartialEq, Eq, Routable)]
#[rustfmt::skip]
pub enum Route {
    #[layout(RouteGuard)]
        #[route("/")]
        Home {},

        #[route("/member/:id")]
        MemberDetail { id: String },

        /// `redirect` is the path to return to after signing in (may be empty).
        #[route("/login?:redirect")]
        Login { redirect: String },

        #[route("/admin")]
        Admin {},
}

/// All application routes (without the router)
#[cfg(not(feature = "web"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home {},
    MemberDetail { id: String },
    /// `redirect` is the path to return to after signing in (may be empty).
    Login { redirect: String },
    Admin {},
}

/// Per-route guard annotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
}

/// Outcome of running the guards for a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home {} => "home",
            Route::MemberDetail { .. } => "member-detail",
            Route::Login { .. } => "login",
            Route::Admin {} => "admin",
        }
    }

    pub fn meta(&self) -> RouteMeta {
        match self {
            Route::Login { .. } => RouteMeta {
                guest_only: true,
                ..RouteMeta::default()
            },
            Route::Admin {} => RouteMeta {
                requires_auth: true,
                ..RouteMeta::default()
            },
            Route::Home {} | Route::MemberDetail { .. } => RouteMeta::default(),
        }
    }

    /// Path including the query string, with query values percent-encoded.
    pub fn full_path(&self) -> String {
        match self {
            Route::Home {} => "/".to_string(),
            Route::MemberDetail { id } => format!("/member/{}", urlencoding::encode(id)),
            Route::Login { redirect } if redirect.is_empty() => "/login".to_string(),
            Route::Login { redirect } => {
                format!("/login?redirect={}", urlencoding::encode(redirect))
            }
            Route::Admin {} => "/admin".to_string(),
        }
    }

    /// Parse a path (optionally with a query string) into a route.
    pub fn resolve(path: &str) -> Option<Route> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::Home {}),
            ["member", id] => Some(Route::MemberDetail {
                id: urlencoding::decode(id).ok()?.into_owned(),
            }),
            ["login"] => Some(Route::Login {
                redirect: query.and_then(|q| query_param(q, "redirect")).unwrap_or_default(),
            }),
            ["admin"] => Some(Route::Admin {}),
            _ => None,
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            urlencoding::decode(v).ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Decide whether navigating to `target` may proceed.
///
/// - requires-auth without a session: go to login, remembering the target
/// - guest-only with a session: go home
pub fn guard(target: &Route, is_logged_in: bool) -> Navigation {
    let meta = target.meta();

    if meta.requires_auth && !is_logged_in {
        return Navigation::Redirect(Route::Login {
            redirect: target.full_path(),
        });
    }

    if meta.guest_only && is_logged_in {
        return Navigation::Redirect(Route::Home {});
    }

    Navigation::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_without_session_redirects_to_login() {
        assert_eq!(
            guard(&Route::Admin {}, false),
            Navigation::Redirect(Route::Login {
                redirect: "/admin".to_string()
            })
        );
    }

    #[test]
    fn login_with_session_redirects_home() {
        let target = Route::Login {
            redirect: String::new(),
        };
        assert_eq!(guard(&target, true), Navigation::Redirect(Route::Home {}));
        assert_eq!(guard(&target, false), Navigation::Allow);
    }

    #[test]
    fn public_routes_are_always_allowed() {
        for logged_in in [false, true] {
            assert_eq!(guard(&Route::Home {}, logged_in), Navigation::Allow);
            assert_eq!(
                guard(&Route::MemberDetail { id: "m1".into() }, logged_in),
                Navigation::Allow
            );
        }
        assert_eq!(guard(&Route::Admin {}, true), Navigation::Allow);
    }

    #[test]
    fn login_path_round_trips_redirect() {
        let route = Route::Login {
            redirect: "/admin".to_string(),
        };
        assert_eq!(route.full_path(), "/login?redirect=%2Fadmin");
        assert_eq!(Route::resolve(&route.full_path()), Some(route));
    }

    #[test]
    fn resolve_known_and_unknown_paths() {
        assert_eq!(Route::resolve("/"), Some(Route::Home {}));
        assert_eq!(
            Route::resolve("/member/abc"),
            Some(Route::MemberDetail { id: "abc".into() })
        );
        assert_eq!(
            Route::resolve("/login"),
            Some(Route::Login {
                redirect: String::new()
            })
        );
        assert_eq!(Route::resolve("/admin/"), Some(Route::Admin {}));
        assert_eq!(Route::resolve("/nowhere"), None);
    }

    #[test]
    fn names_match_route_table() {
        assert_eq!(Route::Home {}.name(), "home");
        assert_eq!(Route::MemberDetail { id: "x".into() }.name(), "member-detail");
        assert_eq!(Route::Admin {}.name(), "admin");
    }
}
