//! JSON Schemas for tool inputs

use crate::error::BmadResult;
use crate::prd::RequirementsValidationRequest;
use crate::story::StoryValidationRequest;
use crate::tools::RunChecklistRequest;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde_json::Value;

/// JSON Schema for a request type
///
/// # Errors
/// `BmadError::Schema` if the schema cannot be converted to JSON
pub fn input_schema<T: JsonSchema>() -> BmadResult<Value> {
    Ok(serde_json::to_value(schemars::schema_for!(T))?)
}

/// Input schemas keyed by tool name
///
/// # Errors
/// `BmadError::Schema` if a schema cannot be converted to JSON
pub fn tool_schemas() -> BmadResult<IndexMap<&'static str, Value>> {
    let mut schemas = IndexMap::new();
    schemas.insert(
        crate::tools::RUN_CHECKLIST_TOOL,
        input_schema::<RunChecklistRequest>()?,
    );
    schemas.insert(
        crate::story::VALIDATE_STORY_TOOL,
        input_schema::<StoryValidationRequest>()?,
    );
    schemas.insert(
        crate::prd::VALIDATE_REQUIREMENTS_TOOL,
        input_schema::<RequirementsValidationRequest>()?,
    );
    Ok(schemas)
}
