//! Built-in source definitions embedded in the binary
//!
//! The multi-source variant fetches these unless a sources file is given.

use crate::config::{SourceDefinition, SourcesFile};
use crate::error::Result;

/// Built-in sources YAML
pub const BUILTIN_SOURCES_YAML: &str = include_str!("../sources/users.yaml");

/// Parse the built-in sources
pub fn builtin_sources() -> Result<Vec<SourceDefinition>> {
    Ok(SourcesFile::from_yaml(BUILTIN_SOURCES_YAML)?.sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceSchema;

    #[test]
    fn test_builtin_sources() {
        let sources = builtin_sources().unwrap();
        assert_eq!(sources.len(), 2);

        let jp = &sources[0];
        assert_eq!(jp.name, "jsonplaceholder");
        assert_eq!(jp.url, "https://jsonplaceholder.typicode.com/users");
        assert_eq!(jp.schema, SourceSchema::Jsonplaceholder);

        let ru = &sources[1];
        assert_eq!(ru.name, "randomuser");
        assert_eq!(ru.url, "https://randomuser.me/api/?results=100");
        assert_eq!(ru.schema, SourceSchema::Randomuser);
    }
}
