use super::GlamTool;
use glam_core::prompt;
use std::path::Path;

pub struct GetContextTool;

impl GlamTool for GetContextTool {
    fn name(&self) -> &str {
        "get_glam_context"
    }

    fn description(&self) -> &str {
        "Get a research prompt for producing a context document about a technical object"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "spec_object": {
                    "type": "string",
                    "description": "The technical object to research, e.g. 'AWS CDK Stack'"
                }
            },
            "required": ["spec_object"]
        })
    }

    fn call(&self, args: serde_json::Value, _root: &Path) -> Result<serde_json::Value, String> {
        let spec_object = args["spec_object"]
            .as_str()
            .ok_or_else(|| "missing required argument: spec_object".to_string())?;

        Ok(serde_json::Value::String(prompt::research(spec_object)))
    }
}
