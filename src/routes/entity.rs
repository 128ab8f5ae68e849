//! Entity CRUD routes built from the resolved model.
//! Each entity gets static paths, so a verb the entity does not allow (PATCH on directors)
//! is answered with 405 by the router itself.

use crate::config::{Operation, ResolvedEntity};
use crate::extractors::EntityKind;
use crate::handlers::entity::{create, delete as delete_handler, list, merge, read, replace};
use crate::state::AppState;
use axum::{routing::MethodRouter, Extension, Router};
use std::sync::Arc;

fn collection_methods(entity: &ResolvedEntity) -> MethodRouter<AppState> {
    let mut methods = MethodRouter::new();
    if entity.allows(Operation::List) {
        methods = methods.get(list);
    }
    if entity.allows(Operation::Create) {
        methods = methods.post(create);
    }
    methods
}

fn item_methods(entity: &ResolvedEntity) -> MethodRouter<AppState> {
    let mut methods = MethodRouter::new();
    if entity.allows(Operation::Read) {
        methods = methods.get(read);
    }
    if entity.allows(Operation::Replace) {
        methods = methods.put(replace);
    }
    if entity.allows(Operation::Merge) {
        methods = methods.patch(merge);
    }
    if entity.allows(Operation::Delete) {
        methods = methods.delete(delete_handler);
    }
    methods
}

/// `/{segment}`, `/{segment}/` and `/{segment}/:id` for every entity.
pub fn entity_routes(state: AppState) -> Router {
    let mut router = Router::new();
    for entity in &state.model.entities {
        let base = format!("/{}", entity.path_segment);
        let sub = Router::new()
            .route(&base, collection_methods(entity))
            .route(&format!("{}/", base), collection_methods(entity))
            .route(&format!("{}/:id", base), item_methods(entity))
            .layer(Extension(EntityKind(Arc::clone(entity))));
        router = router.merge(sub);
    }
    router.with_state(state)
}
