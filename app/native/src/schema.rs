//! JSON Schema generation for the configuration file.
//!
//! The schema can be referenced from a config file (`"$schema"`) so editors
//! offer completion and validation.

use schemars::schema_for;

use crate::config::RoomdeckConfig;

/// Generates the JSON Schema of `RoomdeckConfig`.
#[must_use]
pub fn generate_schema() -> serde_json::Value {
    let schema = schema_for!(RoomdeckConfig);
    serde_json::to_value(&schema).unwrap_or_default()
}

/// Generates the JSON Schema as a pretty-printed string.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_sections() {
        let schema = generate_schema();
        let properties = &schema["properties"];
        assert!(properties.get("presence").is_some());
        assert!(properties.get("storage").is_some());
    }

    #[test]
    fn test_print_schema_is_json() {
        let output = print_schema();
        assert!(serde_json::from_str::<serde_json::Value>(&output).is_ok());
    }
}
