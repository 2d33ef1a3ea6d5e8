use crate::error::CliError;
use handler_core::{IndentSettings, SearchDirection, SessionConfig, UnresolvedSignature};
use handler_core_lang::{FrameworkConfig, HandlerStyle};
use serde::Deserialize;
use std::path::Path;

/// On-disk session configuration. Every field is optional.
///
/// ```json
/// {
///   "framework": { "handler_prefix": "on" },
///   "style": { "class_stub": "method", "type_annotations": false },
///   "tab_width": 2,
///   "search": "inward",
///   "unresolved_signature": "empty_parameters"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub framework: FrameworkConfig,
    pub style: HandlerStyle,
    pub tab_width: usize,
    pub indent_with_tabs: bool,
    pub search: SearchDirection,
    pub unresolved_signature: UnresolvedSignature,
    pub max_superclass_depth: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            framework: session.framework,
            style: session.style,
            tab_width: session.indent.tab_width,
            indent_with_tabs: false,
            search: session.direction,
            unresolved_signature: session.unresolved_signature,
            max_superclass_depth: session.max_superclass_depth,
        }
    }
}

impl From<ConfigFile> for SessionConfig {
    fn from(file: ConfigFile) -> Self {
        let indent = if file.indent_with_tabs {
            IndentSettings::tabs(file.tab_width)
        } else {
            IndentSettings::spaces(file.tab_width)
        };

        SessionConfig::default()
            .with_framework(file.framework)
            .with_style(file.style)
            .with_indent(indent)
            .with_direction(file.search)
            .with_unresolved_signature(file.unresolved_signature)
            .with_max_superclass_depth(file.max_superclass_depth)
    }
}

pub fn parse_config(path: &Path, json: &str) -> Result<SessionConfig, CliError> {
    let file = serde_json::from_str::<ConfigFile>(json).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.into())
}

pub async fn load_config(path: &Path) -> Result<SessionConfig, CliError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_config(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use handler_core::IndentUnit;
    use handler_core_lang::ClassStubStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            Path::new("cfg.json"),
            r#"{
                "framework": { "handler_prefix": "on" },
                "style": { "class_stub": "method" },
                "tab_width": 2,
                "indent_with_tabs": true,
                "search": "inward",
                "unresolved_signature": "empty_parameters",
                "max_superclass_depth": 2
            }"#,
        )
        .unwrap();

        assert_eq!(config.framework.handler_name("onClick"), "onOnClick");
        assert!(config.framework.is_base_component("React.Component"));
        assert_eq!(config.style.class_stub, ClassStubStyle::Method);
        assert!(config.style.type_annotations);
        assert_eq!(config.indent.unit, IndentUnit::Tab);
        assert_eq!(config.indent.tab_width, 2);
        assert_eq!(config.direction, SearchDirection::Inward);
        assert_eq!(config.unresolved_signature, UnresolvedSignature::EmptyParameters);
        assert_eq!(config.max_superclass_depth, 2);
    }

    #[test]
    fn test_empty_config_is_the_default_session() {
        let config = parse_config(Path::new("cfg.json"), "{}").unwrap();
        let default = SessionConfig::default();
        assert_eq!(config.direction, default.direction);
        assert_eq!(config.unresolved_signature, default.unresolved_signature);
        assert_eq!(config.max_superclass_depth, default.max_superclass_depth);
        assert_eq!(config.indent.tab_width, default.indent.tab_width);
    }

    #[test]
    fn test_invalid_config_names_the_file() {
        let err = parse_config(Path::new("bad.json"), r#"{ "search": "sideways" }"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid config bad.json"));
    }
}
