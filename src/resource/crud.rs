//! CRUD resource
//!
//! A single catalog object together with the action the caller wants to
//! perform on it. The resource derives the endpoint path and the parameter
//! set for that action, refusing to do so when the combination is invalid.

use super::action::Action;
use super::registry::ResourceDef;
use crate::ckan::{ActionRequest, DispatchError, Transport};
use crate::error::{CrudError, Result};
use serde_json::{Map, Value};

/// Parameter mapping sent with a catalog action
pub type Parameters = Map<String, Value>;

/// One catalog object capable of the actions its definition accepts
#[derive(Debug, Clone)]
pub struct CrudResource<'a> {
    def: &'a ResourceDef,
    /// Identifier assigned by the catalog; empty for objects not yet created
    id: String,
    action: Option<Action>,
    parameters: Parameters,
}

impl<'a> CrudResource<'a> {
    /// Resource of type `def` targeting `id`, with no action selected
    pub fn new(def: &'a ResourceDef, id: impl Into<String>) -> Self {
        Self {
            def,
            id: id.into(),
            action: None,
            parameters: Parameters::new(),
        }
    }

    /// Definition this resource was built from
    pub fn definition(&self) -> &'a ResourceDef {
        self.def
    }

    /// Resource type prefix used in endpoint paths
    pub fn machine_name(&self) -> &str {
        &self.def.machine_name
    }

    /// Catalog identifier; empty before the object is created
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Currently selected action, if any
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Actions this resource type accepts, in definition order
    pub fn valid_actions(&self) -> &[Action] {
        &self.def.valid_actions
    }

    /// Select the action to perform. Rejected actions leave the previous
    /// selection in place.
    pub fn set_action(&mut self, action: Action) -> Result<()> {
        if !self.def.supports(action) {
            tracing::warn!(
                "Rejected action '{}' for '{}'",
                action,
                self.def.machine_name
            );
            return Err(CrudError::InvalidAction {
                machine_name: self.def.machine_name.clone(),
                action: action.to_string(),
            });
        }

        tracing::debug!("Selected action '{}' for '{}'", action, self.def.machine_name);
        self.action = Some(action);
        Ok(())
    }

    /// Select an action by its catalog name
    pub fn set_action_str(&mut self, action: &str) -> Result<()> {
        let parsed = action.parse::<Action>().map_err(|_| CrudError::InvalidAction {
            machine_name: self.def.machine_name.clone(),
            action: action.to_string(),
        })?;
        self.set_action(parsed)
    }

    fn require_action(&self) -> Result<Action> {
        self.action
            .ok_or_else(|| CrudError::PreconditionNotMet(self.def.machine_name.clone()))
    }

    /// Endpoint path: `<machine_name>_<action>`.
    ///
    /// Definitions built by hand are validated here, so a malformed machine
    /// name never reaches a request.
    pub fn path(&self) -> Result<String> {
        let action = self.require_action()?;
        self.def.validate()?;
        Ok(format!("{}_{}", self.def.machine_name, action))
    }

    /// Caller-populated parameters as they stand, without validation
    pub fn parameters_ref(&self) -> &Parameters {
        &self.parameters
    }

    /// Set one parameter, replacing any previous value
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Replace all parameters
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    /// Add parameters, replacing values for keys already present
    pub fn extend_parameters<K, V>(&mut self, parameters: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.parameters
            .extend(parameters.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Parameters to send for the selected action.
    ///
    /// Create, update and patch send the caller's parameters after
    /// validation; update and patch also get `id` injected. List, show and
    /// delete only ever send the id.
    pub fn parameters(&mut self) -> Result<Parameters> {
        let action = self.require_action()?;

        if action.requires_parameters() {
            self.prepare_parameters(action)?;
            return Ok(self.parameters.clone());
        }

        let mut only_id = Parameters::new();
        only_id.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(only_id)
    }

    fn prepare_parameters(&mut self, action: Action) -> Result<()> {
        if action == Action::Create {
            let missing: Vec<String> = self
                .def
                .required_parameters
                .keys()
                .filter(|name| !self.parameters.contains_key(name.as_str()))
                .cloned()
                .collect();

            if !missing.is_empty() {
                return Err(CrudError::MissingParameters {
                    machine_name: self.def.machine_name.clone(),
                    missing,
                });
            }
        }

        if action.requires_identifier() {
            if self.id.is_empty() {
                return Err(CrudError::MissingIdentifier {
                    machine_name: self.def.machine_name.clone(),
                    action,
                });
            }
            self.parameters
                .insert("id".to_string(), Value::String(self.id.clone()));
        }

        Ok(())
    }

    /// Validated request for the selected action
    pub fn request(&mut self) -> Result<ActionRequest> {
        let action = self.require_action()?;
        let path = self.path()?;
        let parameters = self.parameters()?;
        tracing::debug!("Built request {} with {} parameters", path, parameters.len());
        Ok(ActionRequest::new(path, action, parameters))
    }

    /// Build the request and hand it to `transport`. Nothing is sent when
    /// the resource is not in a valid state.
    pub fn dispatch<T: Transport>(
        &mut self,
        transport: &T,
    ) -> std::result::Result<T::Output, DispatchError<T::Error>> {
        let request = self.request()?;
        tracing::info!("Dispatching {} {}", request.method(), request.path());
        transport.send(&request).map_err(DispatchError::Transport)
    }
}
