//! OpenAPI document generated from the resolved model, served at `/swagger.json`.

use crate::config::{Operation, ResolvedEntity, ResolvedModel};
use crate::state::AppState;
use axum::{extract::State, Json};
use utoipa::openapi::path::{
    HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItem, PathItemBuilder,
};
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::schema::{ObjectBuilder, Schema, Type};
use utoipa::openapi::tag::TagBuilder;
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, RefOr, Required};

fn integer_schema() -> RefOr<Schema> {
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(Type::Integer).build()))
}

fn operation(entity: &ResolvedEntity, op: Operation) -> utoipa::openapi::path::Operation {
    let (verb, summary, ok_code, ok_desc) = match op {
        Operation::List => ("list", "List all", "200", "Entities"),
        Operation::Create => ("create", "Create", "204", "Created"),
        Operation::Read => ("read", "Fetch by id", "200", "Entity"),
        Operation::Replace => ("replace", "Replace every field", "204", "Replaced"),
        Operation::Merge => ("merge", "Update the given fields", "204", "Updated"),
        Operation::Delete => ("delete", "Delete", "204", "Deleted"),
    };
    let mut builder = OperationBuilder::new()
        .tag(entity.path_segment.clone())
        .operation_id(Some(format!("{}_{}", verb, entity.path_segment)))
        .summary(Some(format!("{} {}", summary, entity.path_segment)))
        .response(ok_code, ResponseBuilder::new().description(ok_desc).build());

    match op {
        Operation::List => {
            for f in &entity.filters {
                builder = builder.parameter(
                    ParameterBuilder::new()
                        .name(f.clone())
                        .parameter_in(ParameterIn::Query)
                        .required(Required::False)
                        .schema(Some(integer_schema()))
                        .build(),
                );
            }
            builder = builder.response("404", ResponseBuilder::new().description("No entities").build());
        }
        Operation::Create => {
            builder = builder.response("422", ResponseBuilder::new().description("Validation error").build());
        }
        Operation::Read | Operation::Replace | Operation::Merge | Operation::Delete => {
            builder = builder
                .parameter(
                    ParameterBuilder::new()
                        .name("id")
                        .parameter_in(ParameterIn::Path)
                        .required(Required::True)
                        .schema(Some(integer_schema()))
                        .build(),
                )
                .response("404", ResponseBuilder::new().description("Not found").build());
            if matches!(op, Operation::Replace | Operation::Merge) {
                builder = builder.response("422", ResponseBuilder::new().description("Validation error").build());
            }
        }
    }
    builder.build()
}

fn path_item(entity: &ResolvedEntity, ops: &[(Operation, HttpMethod)]) -> Option<PathItem> {
    let allowed: Vec<_> = ops.iter().filter(|(op, _)| entity.allows(*op)).collect();
    if allowed.is_empty() {
        return None;
    }
    let mut item = PathItemBuilder::new();
    for (op, method) in allowed {
        item = item.operation(method.clone(), operation(entity, *op));
    }
    Some(item.build())
}

pub fn build_openapi(model: &ResolvedModel) -> OpenApi {
    let mut paths = PathsBuilder::new();
    let mut tags = Vec::new();
    for entity in &model.entities {
        let collection = [(Operation::List, HttpMethod::Get), (Operation::Create, HttpMethod::Post)];
        let item = [
            (Operation::Read, HttpMethod::Get),
            (Operation::Replace, HttpMethod::Put),
            (Operation::Merge, HttpMethod::Patch),
            (Operation::Delete, HttpMethod::Delete),
        ];
        if let Some(p) = path_item(entity, &collection) {
            paths = paths.path(format!("/{}/", entity.path_segment), p);
        }
        if let Some(p) = path_item(entity, &item) {
            paths = paths.path(format!("/{}/{{id}}", entity.path_segment), p);
        }
        tags.push(TagBuilder::new().name(entity.path_segment.clone()).build());
    }
    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(env!("CARGO_PKG_NAME"))
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .paths(paths.build())
        .tags(Some(tags))
        .build()
}

pub async fn swagger_json(State(state): State<AppState>) -> Json<OpenApi> {
    Json(build_openapi(&state.model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, FullConfig};

    #[test]
    fn patch_documented_for_movies_only() {
        let model = resolve(&FullConfig::builtin().unwrap()).unwrap();
        let doc = serde_json::to_value(build_openapi(&model)).unwrap();
        let paths = &doc["paths"];
        assert!(paths["/movies/{id}"]["patch"].is_object());
        assert!(paths["/directors/{id}"]["patch"].is_null());
        assert!(paths["/genres/{id}"]["put"].is_object());
        assert!(paths["/movies/"]["get"].is_object());
        let params = paths["/movies/"]["get"]["parameters"].as_array().unwrap();
        let names: Vec<&str> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["genre_id", "director_id"]);
    }
}
