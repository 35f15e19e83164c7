//! Resource Registry - Load resource definitions from JSON or YAML
//!
//! A resource type is described entirely by data: its machine name, the
//! parameters a create call must carry, and the actions it accepts. This
//! module parses those definitions and provides lookup for the rest of the
//! crate.

use super::action::Action;
use super::crud::CrudResource;
use crate::error::{CrudError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

fn default_actions() -> Vec<Action> {
    Action::CRUD.to_vec()
}

/// Resource type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDef {
    /// Prefix of every endpoint path for this type, e.g. `package`
    pub machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Parameter name to constraint description, checked on create
    #[serde(default)]
    pub required_parameters: BTreeMap<String, String>,
    #[serde(default = "default_actions")]
    pub valid_actions: Vec<Action>,
}

impl ResourceDef {
    /// Definition accepting the five CRUD actions with no required parameters
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            display_name: None,
            required_parameters: BTreeMap::new(),
            valid_actions: default_actions(),
        }
    }

    /// Set the name shown to users
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Require `name` on create; `constraint` describes the expected value
    pub fn with_required(mut self, name: impl Into<String>, constraint: impl Into<String>) -> Self {
        self.required_parameters.insert(name.into(), constraint.into());
        self
    }

    /// Replace the accepted actions
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.valid_actions = actions.into_iter().collect();
        self
    }

    /// Whether `action` is one of the accepted actions
    pub fn supports(&self, action: Action) -> bool {
        self.valid_actions.contains(&action)
    }

    /// Name shown to users, falling back to the machine name
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.machine_name)
    }

    /// Check that the definition can produce well-formed endpoint paths
    pub fn validate(&self) -> Result<()> {
        if self.machine_name.is_empty() {
            return Err(CrudError::InvalidDefinition(
                "machine name must not be empty".to_string(),
            ));
        }

        let well_formed = self
            .machine_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(CrudError::InvalidDefinition(format!(
                "machine name '{}' may only contain lowercase letters, digits and '_'",
                self.machine_name
            )));
        }

        let mut seen = BTreeSet::new();
        for action in &self.valid_actions {
            if !seen.insert(*action) {
                return Err(CrudError::InvalidDefinition(format!(
                    "'{}' lists action '{}' more than once",
                    self.machine_name, action
                )));
            }
        }

        Ok(())
    }
}

/// Root structure of a definitions file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DefinitionsFile {
    #[serde(default)]
    resources: Vec<ResourceDef>,
}

/// Validated set of resource definitions keyed by machine name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: BTreeMap<String, ResourceDef>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting invalid or duplicated definitions
    pub fn from_defs(defs: impl IntoIterator<Item = ResourceDef>) -> Result<Self> {
        let mut registry = Self::new();
        for def in defs {
            registry.insert(def)?;
        }
        Ok(registry)
    }

    /// Parse a JSON definitions file
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: DefinitionsFile = serde_json::from_str(content)?;
        Self::from_defs(file.resources)
    }

    /// Parse a YAML definitions file
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: DefinitionsFile = serde_yaml::from_str(content)?;
        Self::from_defs(file.resources)
    }

    /// Load definitions from disk, choosing the parser by file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let registry = match extension.as_deref() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(CrudError::UnsupportedFormat(path.display().to_string())),
        };

        tracing::debug!(
            "Loaded {} resource definitions from {:?}",
            registry.len(),
            path
        );
        Ok(registry)
    }

    /// Add a definition
    pub fn insert(&mut self, def: ResourceDef) -> Result<()> {
        def.validate()?;
        if self.resources.contains_key(&def.machine_name) {
            return Err(CrudError::InvalidDefinition(format!(
                "duplicate machine name '{}'",
                def.machine_name
            )));
        }
        self.resources.insert(def.machine_name.clone(), def);
        Ok(())
    }

    /// Get a resource definition by machine name
    pub fn get(&self, machine_name: &str) -> Option<&ResourceDef> {
        self.resources.get(machine_name)
    }

    /// Machine names in sorted order
    pub fn machine_names(&self) -> Vec<&str> {
        self.resources.keys().map(|s| s.as_str()).collect()
    }

    /// Definitions in machine name order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDef> {
        self.resources.values()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no definitions are loaded
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Create a resource of the given type targeting `id`
    pub fn resource(&self, machine_name: &str, id: impl Into<String>) -> Result<CrudResource<'_>> {
        let def = self
            .get(machine_name)
            .ok_or_else(|| CrudError::UnknownResource(machine_name.to_string()))?;
        Ok(CrudResource::new(def, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS_JSON: &str = r#"{
        "resources": [
            {
                "machine_name": "package",
                "display_name": "Datasets",
                "required_parameters": {"name": "url-safe dataset name"},
                "valid_actions": ["list", "show", "create", "update", "delete", "patch"]
            },
            {
                "machine_name": "tag",
                "valid_actions": ["list", "show"]
            },
            {
                "machine_name": "organization"
            }
        ]
    }"#;

    const DEFINITIONS_YAML: &str = r#"
resources:
  - machine_name: resource
    required_parameters:
      package_id: id of the parent dataset
      url: location of the data
  - machine_name: group
    valid_actions: [list, show]
"#;

    #[test]
    fn test_registry_loads_json() {
        let registry = Registry::from_json_str(DEFINITIONS_JSON).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.machine_names(), vec!["organization", "package", "tag"]);

        let package = registry.get("package").unwrap();
        assert_eq!(package.label(), "Datasets");
        assert!(package.supports(Action::Patch));
        assert_eq!(
            package.required_parameters.get("name").map(String::as_str),
            Some("url-safe dataset name")
        );
    }

    #[test]
    fn test_missing_actions_default_to_crud() {
        let registry = Registry::from_json_str(DEFINITIONS_JSON).unwrap();
        let organization = registry.get("organization").unwrap();
        assert_eq!(organization.valid_actions, Action::CRUD.to_vec());
        assert_eq!(organization.label(), "organization");
    }

    #[test]
    fn test_registry_loads_yaml() {
        let registry = Registry::from_yaml_str(DEFINITIONS_YAML).unwrap();
        let resource = registry.get("resource").unwrap();
        assert_eq!(resource.required_parameters.len(), 2);
        assert_eq!(
            registry.get("group").unwrap().valid_actions,
            vec![Action::List, Action::Show]
        );
    }

    #[test]
    fn test_duplicate_machine_name_rejected() {
        let result = Registry::from_defs([ResourceDef::new("package"), ResourceDef::new("package")]);
        assert!(matches!(result, Err(CrudError::InvalidDefinition(_))));
    }

    #[test]
    fn test_malformed_machine_name_rejected() {
        for name in ["", "Package", "package-show", "pack age"] {
            let result = ResourceDef::new(name).validate();
            assert!(
                matches!(result, Err(CrudError::InvalidDefinition(_))),
                "'{}' should be rejected",
                name
            );
        }
        assert!(ResourceDef::new("resource_view").validate().is_ok());
    }

    #[test]
    fn test_builder_matches_parsed_definition() {
        let built = ResourceDef::new("package")
            .with_display_name("Datasets")
            .with_required("name", "url-safe dataset name")
            .with_actions(Action::ALL);
        let registry = Registry::from_json_str(DEFINITIONS_JSON).unwrap();
        assert_eq!(&built, registry.get("package").unwrap());
    }

    #[test]
    fn test_duplicate_action_rejected() {
        let def = ResourceDef::new("tag").with_actions([Action::List, Action::List]);
        assert!(matches!(def.validate(), Err(CrudError::InvalidDefinition(_))));
    }

    #[test]
    fn test_unknown_action_name_fails_to_parse() {
        let content = r#"{"resources": [{"machine_name": "tag", "valid_actions": ["purge"]}]}"#;
        assert!(matches!(
            Registry::from_json_str(content),
            Err(CrudError::Json(_))
        ));
    }

    #[test]
    fn test_resource_lookup() {
        let registry = Registry::from_json_str(DEFINITIONS_JSON).unwrap();
        let resource = registry.resource("package", "abc-123").unwrap();
        assert_eq!(resource.machine_name(), "package");
        assert_eq!(resource.id(), "abc-123");

        assert_eq!(resource.definition(), registry.get("package").unwrap());

        assert!(matches!(
            registry.resource("vocabulary", ""),
            Err(CrudError::UnknownResource(name)) if name == "vocabulary"
        ));
    }

    #[test]
    fn test_from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("defs.json");
        std::fs::write(&json_path, DEFINITIONS_JSON).unwrap();
        assert_eq!(Registry::from_path(&json_path).unwrap().len(), 3);

        let yaml_path = dir.path().join("defs.YML");
        std::fs::write(&yaml_path, DEFINITIONS_YAML).unwrap();
        assert_eq!(Registry::from_path(&yaml_path).unwrap().len(), 2);

        let toml_path = dir.path().join("defs.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            Registry::from_path(&toml_path),
            Err(CrudError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Registry::from_path(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(CrudError::Io(_))));
    }
}
