pub mod decision;
pub mod feature;
pub mod featureset;
pub mod init;
pub mod mcp;
pub mod prompt;
pub mod schema;
pub mod spec;
pub mod status;
