use super::GlamTool;
use glam_core::kinds::DocKind;
use glam_core::schema::schema_text;
use std::path::Path;
use std::str::FromStr;

pub struct GetSchemaTool;

impl GlamTool for GetSchemaTool {
    fn name(&self) -> &str {
        "get_glam_schema"
    }

    fn description(&self) -> &str {
        "Get the authoring schema for one of the ai/ document types"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "schema_type": {
                    "type": "string",
                    "enum": ["decision", "feature", "spec", "context", "task"],
                    "description": "Which document schema to return"
                }
            },
            "required": ["schema_type"]
        })
    }

    fn call(&self, args: serde_json::Value, _root: &Path) -> Result<serde_json::Value, String> {
        let schema_type = args["schema_type"]
            .as_str()
            .ok_or_else(|| "missing required argument: schema_type".to_string())?;

        let kind = DocKind::from_str(schema_type).map_err(|e| e.to_string())?;
        Ok(serde_json::Value::String(schema_text(kind).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn returns_feature_schema() {
        let dir = TempDir::new().unwrap();
        let tool = GetSchemaTool;
        let result = tool
            .call(serde_json::json!({"schema_type": "feature"}), dir.path())
            .unwrap();

        let text = result.as_str().unwrap();
        assert!(text.contains("Scenario:"));
        assert!(text.contains("GIVEN"));
    }

    #[test]
    fn missing_schema_type_errors() {
        let dir = TempDir::new().unwrap();
        let tool = GetSchemaTool;
        let err = tool.call(serde_json::json!({}), dir.path()).unwrap_err();
        assert!(err.contains("missing required argument: schema_type"));
    }

    #[test]
    fn unknown_schema_type_errors() {
        let dir = TempDir::new().unwrap();
        let tool = GetSchemaTool;
        let err = tool
            .call(serde_json::json!({"schema_type": "blueprint"}), dir.path())
            .unwrap_err();
        assert!(err.contains("blueprint"));
    }
}
