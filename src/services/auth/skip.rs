/*
 * Responsibility
 * - token 検証を skip する条件の定義
 *   - route 名の完全一致 / prefix 一致 (SkipRules)
 *   - handler method に付いた exclusion marker (HandlerMarkers)
 * - handler 参照は boundary 側で HandlerRef に正規化済みである前提
 */
use std::collections::{HashMap, HashSet};

use thiserror::Error;

pub const DEFAULT_EXCLUDED_ROUTES: &[&str] = &["app.swagger", "app.swagger_ui"];
pub const DEFAULT_EXCLUDED_ROUTE_PREFIXES: &[&str] =
    &["mainick_keycloak_security_auth_", "_wdt", "_profiler"];
pub const DEFAULT_EXCLUSION_MARKER: &str = "ExcludeTokenValidation";

/// Static skip configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct SkipRules {
    excluded_routes: HashSet<String>,
    excluded_prefixes: Vec<String>,
    marker: String,
}

impl SkipRules {
    pub fn new<R, P>(excluded_routes: R, excluded_prefixes: P, marker: impl Into<String>) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            excluded_routes: excluded_routes.into_iter().map(Into::into).collect(),
            excluded_prefixes: excluded_prefixes.into_iter().map(Into::into).collect(),
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// route 名なし (None) は skip しない
    pub fn skips_route(&self, route: Option<&str>) -> bool {
        let Some(route) = route else {
            return false;
        };

        self.excluded_routes.contains(route)
            || self
                .excluded_prefixes
                .iter()
                .any(|prefix| route.starts_with(prefix.as_str()))
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDED_ROUTES.iter().copied(),
            DEFAULT_EXCLUDED_ROUTE_PREFIXES.iter().copied(),
            DEFAULT_EXCLUSION_MARKER,
        )
    }
}

/// Resolved handler reference for a matched route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerRef {
    /// Inline closure handler (class/method を持たない)
    Anonymous,
    ClassMethod { class: String, method: String },
    /// Malformed reference; never skipped
    Unresolvable,
}

impl HandlerRef {
    pub fn class_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::ClassMethod {
            class: class.into(),
            method: method.into(),
        }
    }

    /// `"Class::method"` / `"Class:method"` 形式を解釈する。
    /// 区切りで 2 つに分かれない場合は `Unresolvable`。
    pub fn parse(raw: &str) -> Self {
        let split = raw.split_once("::").or_else(|| raw.split_once(':'));

        match split {
            Some((class, method))
                if !class.is_empty()
                    && !method.is_empty()
                    && !class.contains(':')
                    && !method.contains(':') =>
            {
                Self::class_method(class, method)
            }
            _ => Self::Unresolvable,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkerLookupError {
    #[error("unknown handler method: {class}::{method}")]
    UnknownHandler { class: String, method: String },
}

/// Handler method metadata, filled when routes are registered.
///
/// Key は (class, method)。値はその method に付いている marker 名の集合。
#[derive(Debug, Clone, Default)]
pub struct HandlerMarkers {
    methods: HashMap<(String, String), HashSet<String>>,
}

impl HandlerMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler method (marker なしでも登録しておく)
    pub fn register<M>(&mut self, class: &str, method: &str, markers: M)
    where
        M: IntoIterator,
        M::Item: Into<String>,
    {
        self.methods
            .entry((class.to_string(), method.to_string()))
            .or_default()
            .extend(markers.into_iter().map(Into::into));
    }

    pub fn lookup(
        &self,
        class: &str,
        method: &str,
        marker: &str,
    ) -> Result<bool, MarkerLookupError> {
        self.methods
            .get(&(class.to_string(), method.to_string()))
            .map(|markers| markers.contains(marker))
            .ok_or_else(|| MarkerLookupError::UnknownHandler {
                class: class.to_string(),
                method: method.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_skip_exact_names_and_prefixes() {
        let rules = SkipRules::default();

        assert!(rules.skips_route(Some("app.swagger")));
        assert!(rules.skips_route(Some("app.swagger_ui")));
        assert!(rules.skips_route(Some("mainick_keycloak_security_auth_login")));
        assert!(rules.skips_route(Some("_wdt")));
        assert!(rules.skips_route(Some("_profiler_home")));

        assert!(!rules.skips_route(Some("app.swagger.json")));
        assert!(!rules.skips_route(Some("orders.show")));
        assert!(!rules.skips_route(None));
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let rules = SkipRules::new(["public.home"], ["docs."], "Public");

        assert!(rules.skips_route(Some("public.home")));
        assert!(rules.skips_route(Some("docs.index")));
        assert!(!rules.skips_route(Some("app.swagger")));
        assert_eq!(rules.marker(), "Public");
    }

    #[test]
    fn parse_accepts_single_and_double_colon() {
        assert_eq!(
            HandlerRef::parse("OrderController::show"),
            HandlerRef::class_method("OrderController", "show")
        );
        assert_eq!(
            HandlerRef::parse("OrderController:show"),
            HandlerRef::class_method("OrderController", "show")
        );
    }

    #[test]
    fn parse_rejects_malformed_references() {
        for raw in [
            "",
            "OrderController",
            "OrderController::",
            "::show",
            "A::b::c",
            "A:::b",
        ] {
            assert_eq!(HandlerRef::parse(raw), HandlerRef::Unresolvable, "{raw}");
        }
    }

    #[test]
    fn lookup_reports_marker_presence() {
        let mut markers = HandlerMarkers::new();
        markers.register("HealthController", "health", [DEFAULT_EXCLUSION_MARKER]);
        markers.register("OrderController", "show", Vec::<String>::new());

        assert_eq!(
            markers.lookup("HealthController", "health", DEFAULT_EXCLUSION_MARKER),
            Ok(true)
        );
        assert_eq!(
            markers.lookup("OrderController", "show", DEFAULT_EXCLUSION_MARKER),
            Ok(false)
        );
        assert!(matches!(
            markers.lookup("OrderController", "missing", DEFAULT_EXCLUSION_MARKER),
            Err(MarkerLookupError::UnknownHandler { .. })
        ));
    }
}
