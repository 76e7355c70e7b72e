/*
 * Responsibility
 * - route 登録時に「route 名」と「handler 参照」を記録する (RouteCatalog)
 * - axum には route 名の概念がないため、(Method, matched path) をキーにする
 * - handler の exclusion marker もここで HandlerMarkers に登録する
 *
 * Notes
 * - handler 参照の形 (closure / (class, method) / "Class::method") は
 *   ここで HandlerRef に正規化する。gate 側で文字列は解釈しない。
 */
use std::collections::HashMap;

use axum::{Router, http::Method, routing::MethodRouter};

use crate::services::auth::{HandlerMarkers, HandlerRef};

/// Handler reference as written at registration time.
#[derive(Debug, Clone, Copy)]
pub enum Handler<'a> {
    Closure,
    Pair(&'a str, &'a str),
    Named(&'a str),
}

impl From<Handler<'_>> for HandlerRef {
    fn from(handler: Handler<'_>) -> Self {
        match handler {
            Handler::Closure => HandlerRef::Anonymous,
            Handler::Pair(class, method) if !class.is_empty() && !method.is_empty() => {
                HandlerRef::class_method(class, method)
            }
            Handler::Pair(..) => HandlerRef::Unresolvable,
            Handler::Named(raw) => HandlerRef::parse(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub name: Option<String>,
    pub handler: HandlerRef,
}

/// Route metadata for one (method, path) pair.
#[derive(Debug, Clone)]
pub struct RouteDef {
    method: Method,
    name: Option<String>,
    handler: HandlerRef,
    markers: Vec<String>,
}

impl RouteDef {
    pub fn new(method: Method, handler: Handler<'_>) -> Self {
        Self {
            method,
            name: None,
            handler: handler.into(),
            markers: Vec::new(),
        }
    }

    pub fn get(handler: Handler<'_>) -> Self {
        Self::new(Method::GET, handler)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// handler method に marker を付ける (closure には付けられない)
    pub fn marked(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteCatalog {
    routes: HashMap<(Method, String), RouteMeta>,
    markers: HandlerMarkers,
}

impl RouteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: &str, def: RouteDef) {
        if let HandlerRef::ClassMethod { class, method } = &def.handler {
            self.markers.register(class, method, def.markers);
        }

        self.routes.insert(
            (def.method, path.to_string()),
            RouteMeta {
                name: def.name,
                handler: def.handler,
            },
        );
    }

    /// HEAD は axum が GET route で処理するので、GET の登録内容を返す
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RouteMeta> {
        self.routes
            .get(&(method.clone(), path.to_string()))
            .or_else(|| {
                (*method == Method::HEAD)
                    .then(|| self.routes.get(&(Method::GET, path.to_string())))
                    .flatten()
            })
    }

    pub fn markers(&self) -> &HandlerMarkers {
        &self.markers
    }

    /// `prefix` 配下に route を追加していく builder
    pub fn registrar<S>(&mut self, prefix: &str) -> Registrar<'_, S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Registrar {
            router: Router::new(),
            catalog: self,
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

/// Adds the axum route and its catalog entry in one call.
pub struct Registrar<'a, S> {
    router: Router<S>,
    catalog: &'a mut RouteCatalog,
    prefix: String,
}

impl<S> Registrar<'_, S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn route(mut self, path: &str, method_router: MethodRouter<S>, def: RouteDef) -> Self {
        self.catalog
            .register(&format!("{}{}", self.prefix, path), def);
        self.router = self.router.route(path, method_router);
        self
    }

    pub fn finish(self) -> Router<S> {
        self.router
    }
}
