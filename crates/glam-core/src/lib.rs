pub mod error;
pub mod frontmatter;
pub mod gherkin;
pub mod io;
pub mod kinds;
pub mod paths;
pub mod prompt;
pub mod schema;
pub mod workspace;

pub use error::{GlamError, Result};
