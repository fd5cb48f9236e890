//! Opaque client-side settings blob.
//!
//! The blob also carries bookmarks and UI preferences this core does not
//! interpret; only the viewpoint-host list is read and written, everything
//! else round-trips untouched.

use serde_json::{json, Value};

use crate::{Error, Result};

const VIEWPOINTS_KEY: &str = "viewpoints";

/// The settings blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsBlob {
    value: Value,
}

impl SettingsBlob {
    /// Empty blob.
    pub fn new() -> Self {
        Self {
            value: json!({}),
        }
    }

    /// Parse from the stored JSON text. The top level must be an object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidSettings(
                "settings blob must be a JSON object".to_string(),
            ));
        }
        Ok(Self { value })
    }

    /// Serialize back to JSON text.
    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.value)?)
    }

    /// The stored viewpoint-host list. Non-string entries are ignored.
    pub fn viewpoints(&self) -> Vec<String> {
        self.value
            .get(VIEWPOINTS_KEY)
            .and_then(Value::as_array)
            .map(|hosts| {
                hosts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replace the stored viewpoint-host list, leaving other keys alone.
    pub fn set_viewpoints(&mut self, hosts: &[String]) {
        if let Some(object) = self.value.as_object_mut() {
            object.insert(VIEWPOINTS_KEY.to_string(), json!(hosts));
        }
    }
}
