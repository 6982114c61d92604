//! Helpers that patch generated OpenAPI documents for paginated,
//! soft-deletable and tree-shaped endpoints.
//!
//! Documents are handled as plain `serde_json::Value` trees so the helpers
//! work with whatever OpenAPI model the caller serializes from.

use serde_json::{json, Map, Value};

use crate::error::{ApiError, ApiResult};
use crate::params::{PARAM_PAGE, PARAM_PER_PAGE};

/// Query parameter name to include trashed items.
pub const PARAM_TRASHED: &str = "trashed";

/// Column / property name holding the deletion timestamp.
pub const FIELD_DELETED_AT: &str = "deleted_at";

const FIELD_PARENT: &str = "parent";
const FIELD_CHILDREN: &str = "children";

const GENERATED_PAGE_PARAM: &str = "page";
const GENERATED_PER_PAGE_PARAM: &str = "itemsPerPage";

/// Fix the parameter names of a paginated operation and replace its `200`
/// response with the paginated list schema.
pub fn attach_to(op: &mut Value, description: &str, item_ref: &str) -> ApiResult<()> {
    fix_operation_params(op, GENERATED_PAGE_PARAM, GENERATED_PER_PAGE_PARAM)?;
    set_response(op, description, item_ref)
}

/// Same as [`attach_to`] for generators using other parameter names.
pub fn attach_as(
    op: &mut Value,
    description: &str,
    item_ref: &str,
    page_param: &str,
    per_page_param: &str,
) -> ApiResult<()> {
    fix_operation_params(op, page_param, per_page_param)?;
    set_response(op, description, item_ref)
}

/// Rename generated `page` / `itemsPerPage` parameters to `page` / `per_page`.
pub fn fix_param_names(params: &mut [Value]) {
    fix_param_names_with(params, GENERATED_PAGE_PARAM, GENERATED_PER_PAGE_PARAM);
}

/// Rename the parameters called `page_param` / `per_page_param` to
/// `page` / `per_page`.
pub fn fix_param_names_with(params: &mut [Value], page_param: &str, per_page_param: &str) {
    for param in params.iter_mut() {
        let Some(name) = param.get("name").and_then(Value::as_str) else {
            continue;
        };
        let renamed = if name == per_page_param {
            PARAM_PER_PAGE
        } else if name == page_param {
            PARAM_PAGE
        } else {
            continue;
        };
        param["name"] = Value::String(renamed.to_string());
    }
}

fn fix_operation_params(op: &mut Value, page_param: &str, per_page_param: &str) -> ApiResult<()> {
    let op = as_object(op, "operation")?;
    if let Some(params) = op.get_mut("parameters") {
        let params = params
            .as_array_mut()
            .ok_or_else(|| ApiError::InvalidDocument("parameters is not an array".to_string()))?;
        fix_param_names_with(params, page_param, per_page_param);
    }
    Ok(())
}

/// Replace the `200` response of `op` with the paginated list schema whose
/// `data` items reference `item_ref`.
pub fn set_response(op: &mut Value, description: &str, item_ref: &str) -> ApiResult<()> {
    let op = as_object(op, "operation")?;
    let responses = op
        .entry("responses")
        .or_insert_with(|| Value::Object(Map::new()));
    let responses = as_object(responses, "responses")?;
    responses.insert("200".to_string(), paginated_response(description, item_ref));
    Ok(())
}

fn paginated_response(description: &str, item_ref: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "current_page": integer_schema("Page number (1-based)", 1),
                        "total": integer_schema("Total number of items", 0),
                        "per_page": integer_schema("Number of items per page", 1),
                        "last_page": integer_schema("Last page number", 1),
                        "from": integer_schema("Index (1-based) of the first item in the current page", 0),
                        "to": integer_schema("Index (1-based) of the last item in the current page", 0),
                        "first_page_url": string_schema("URL to the first page"),
                        "last_page_url": string_schema("URL to the last page"),
                        "next_page_url": string_schema("URL to the next page"),
                        "prev_page_url": string_schema("URL to the previous page"),
                        "path": string_schema("Base path of the request"),
                        "data": {
                            "type": "array",
                            "description": "List of items",
                            "items": { "$ref": item_ref }
                        }
                    },
                    "required": [
                        "current_page",
                        "total",
                        "per_page",
                        "last_page",
                        "from",
                        "to",
                        "first_page_url",
                        "last_page_url",
                        "next_page_url",
                        "prev_page_url",
                        "path",
                        "data"
                    ]
                }
            }
        }
    })
}

fn integer_schema(description: &str, minimum: u64) -> Value {
    json!({ "type": "integer", "description": description, "minimum": minimum })
}

fn string_schema(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// The optional boolean `trashed` query parameter.
pub fn trashed_param() -> Value {
    json!({
        "name": PARAM_TRASHED,
        "in": "query",
        "description": "Whether to include trashed items",
        "required": false,
        "schema": { "type": "boolean" }
    })
}

/// Add the nullable `deleted_at` timestamp property to an object schema.
pub fn add_deleted_at_field(schema: &mut Value) -> ApiResult<()> {
    let schema = as_object(schema, "schema")?;
    let properties = schema
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    let properties = as_object(properties, "properties")?;
    properties.insert(
        FIELD_DELETED_AT.to_string(),
        json!({
            "type": "string",
            "format": "date-time",
            "nullable": true,
            "description": "Date and time when the record was deleted"
        }),
    );
    Ok(())
}

/// Append the `trashed` parameter to an operation.
pub fn add_trashed_param(op: &mut Value) -> ApiResult<()> {
    let op = as_object(op, "operation")?;
    let params = op
        .entry("parameters")
        .or_insert_with(|| Value::Array(Vec::new()));
    let params = params
        .as_array_mut()
        .ok_or_else(|| ApiError::InvalidDocument("parameters is not an array".to_string()))?;
    params.push(trashed_param());
    Ok(())
}

/// Wire soft delete into a whole document.
///
/// Adds `deleted_at` to `components.schemas.<schema_name>`, the `trashed`
/// parameter to the list operation at `base` and to the read and delete
/// operations at `base/{id}`, and a restore endpoint unless the document
/// already has one. Operations missing from the document are skipped.
pub fn attach_soft_delete(
    doc: &mut Value,
    base: &str,
    schema_name: &str,
    id_param: &Value,
) -> ApiResult<()> {
    let pointer = format!("/components/schemas/{}", escape_pointer(schema_name));
    let schema = doc
        .pointer_mut(&pointer)
        .ok_or_else(|| ApiError::MissingField(format!("components.schemas.{schema_name}")))?;
    add_deleted_at_field(schema)?;

    let item_path = item_path(base, id_param)?;
    add_trashed_param_at(doc, base, "get")?;
    add_trashed_param_at(doc, &item_path, "get")?;
    add_trashed_param_at(doc, &item_path, "delete")?;

    let restore_path = format!("{item_path}/restore");
    if doc.get("paths").and_then(|paths| paths.get(&restore_path)).is_none() {
        add_restore_endpoint(doc, &item_path, id_param, &format!("Restore{schema_name}"))?;
    }
    Ok(())
}

/// Add `POST {item_path}/restore`, taking the same id parameter as the item
/// endpoints. An existing entry at that path is replaced.
pub fn add_restore_endpoint(
    doc: &mut Value,
    item_path: &str,
    id_param: &Value,
    operation_id: &str,
) -> ApiResult<()> {
    let doc = as_object(doc, "document")?;
    let paths = doc.entry("paths").or_insert_with(|| Value::Object(Map::new()));
    let paths = as_object(paths, "paths")?;
    paths.insert(
        format!("{}/restore", item_path.trim_end_matches('/')),
        json!({
            "post": {
                "summary": "Restore a trashed record",
                "description": "Restore a record that was previously soft deleted",
                "operationId": operation_id,
                "parameters": [id_param.clone()],
                "responses": {
                    "204": { "description": "Record with requested ID was restored" },
                    "400": { "$ref": "#/components/responses/400" },
                    "404": { "$ref": "#/components/responses/404" },
                    "409": { "$ref": "#/components/responses/409" },
                    "500": { "$ref": "#/components/responses/500" }
                }
            }
        }),
    );
    Ok(())
}

fn add_trashed_param_at(doc: &mut Value, path: &str, method: &str) -> ApiResult<()> {
    match doc
        .get_mut("paths")
        .and_then(|paths| paths.get_mut(path))
        .and_then(|item| item.get_mut(method))
    {
        Some(op) => add_trashed_param(op),
        None => Ok(()),
    }
}

fn item_path(base: &str, id_param: &Value) -> ApiResult<String> {
    let name = id_param
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::MissingField("id parameter name".to_string()))?;
    Ok(format!("{}/{{{name}}}", base.trim_end_matches('/')))
}

fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Remove the named properties from an object schema, along with their
/// `required` entries.
pub fn remove_fields(schema: &mut Value, fields: &[&str]) -> ApiResult<()> {
    let schema = as_object(schema, "schema")?;
    if let Some(properties) = schema.get_mut("properties") {
        let properties = as_object(properties, "properties")?;
        for field in fields {
            properties.remove(*field);
        }
    }
    if let Some(required) = schema.get_mut("required").and_then(Value::as_array_mut) {
        required.retain(|name| !name.as_str().is_some_and(|name| fields.contains(&name)));
    }
    Ok(())
}

/// Drop the `parent` / `children` edges from the JSON request body of a
/// tree entity's create or update operation.
pub fn remove_edges(op: &mut Value) -> ApiResult<()> {
    let schema = op
        .pointer_mut("/requestBody/content/application~1json/schema")
        .ok_or_else(|| ApiError::MissingField("requestBody.content.application/json.schema".to_string()))?;
    remove_fields(schema, &[FIELD_PARENT, FIELD_CHILDREN])
}

fn as_object<'a>(value: &'a mut Value, what: &str) -> ApiResult<&'a mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| ApiError::InvalidDocument(format!("{what} is not an object")))
}
