use std::path::Path;

pub mod get_context;
pub mod get_schema;

pub trait GlamTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    fn call(&self, args: serde_json::Value, root: &Path) -> Result<serde_json::Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn GlamTool>> {
    vec![
        Box::new(get_schema::GetSchemaTool),
        Box::new(get_context::GetContextTool),
    ]
}
