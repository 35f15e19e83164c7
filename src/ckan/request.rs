//! Catalog action requests
//!
//! An [`ActionRequest`] is the validated output of a
//! [`CrudResource`](crate::resource::CrudResource): everything a transport
//! needs to issue the call, and nothing it has to check again.

use crate::error::Result;
use crate::resource::{Action, Parameters};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Path segments under which the catalog serves its action API
const ACTION_API_SEGMENTS: [&str; 3] = ["api", "3", "action"];

/// HTTP verb used for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated catalog call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    path: String,
    action: Action,
    parameters: Parameters,
}

impl ActionRequest {
    pub(crate) fn new(path: String, action: Action, parameters: Parameters) -> Self {
        Self {
            path,
            action,
            parameters,
        }
    }

    /// Endpoint name, e.g. `package_show`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// List and show are reads; everything else is posted
    pub fn method(&self) -> Method {
        if self.action.is_read() {
            Method::Get
        } else {
            Method::Post
        }
    }

    /// Full endpoint URL below `base_url`.
    ///
    /// Reads carry their parameters in the query string, skipping nulls.
    pub fn endpoint(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)?;
        url.set_query(None);
        url.set_fragment(None);

        // The action name is pushed as one encoded segment, never resolved.
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(ACTION_API_SEGMENTS)
            .push(&self.path);

        if self.method() == Method::Get {
            let pairs: Vec<(&str, String)> = self
                .parameters
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(name, value)| (name.as_str(), query_value(value)))
                .collect();

            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (name, value) in &pairs {
                    query.append_pair(name, value);
                }
            }
        }

        Ok(url)
    }

    /// JSON body for posted actions
    pub fn body(&self) -> Option<Value> {
        match self.method() {
            Method::Get => None,
            Method::Post => Some(Value::Object(self.parameters.clone())),
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
