//! Provider identity records.
//!
//! A wallet describes itself with a [`ProviderInfo`]. Every field has an
//! independent format rule; a record that fails any of them is never handed
//! to application code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConnectError, Result};
use crate::validation;

/// Assets a dapp needs to display and identify a wallet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Locally unique identifier. Must be a v4 UUID or the all-zero UUID.
    pub uuid: String,
    /// Human-readable wallet name. Must be non-empty.
    pub name: String,
    /// Wallet icon. Must be an image data URI.
    pub icon: String,
    /// Reverse-DNS identifier, e.g. `com.example.wallet`.
    pub rdns: String,
}

impl ProviderInfo {
    /// Creates an identity record, checking every field.
    pub fn new(
        uuid: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        rdns: impl Into<String>,
    ) -> Result<Self> {
        let info = Self {
            uuid: uuid.into(),
            name: name.into(),
            icon: icon.into(),
            rdns: rdns.into(),
        };
        info.validate()?;
        Ok(info)
    }

    /// Parses and validates an untrusted JSON identity record.
    ///
    /// Fields must be JSON strings; unknown fields are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ConnectError::InvalidProviderDetail("info is not an object".into())
        })?;

        let field = |field: InfoField| -> Result<String> {
            match object.get(field.as_str()) {
                Some(Value::String(s)) => Ok(s.clone()),
                _ => Err(ConnectError::InvalidProviderInfo {
                    field,
                    reason: "must be a string".into(),
                }),
            }
        };

        let info = Self {
            uuid: field(InfoField::Uuid)?,
            name: field(InfoField::Name)?,
            icon: field(InfoField::Icon)?,
            rdns: field(InfoField::Rdns)?,
        };
        info.validate()?;
        Ok(info)
    }

    /// Checks each field against its format rule.
    pub fn validate(&self) -> Result<()> {
        for field in InfoField::ALL {
            validation::check_field(field, self.get(field))?;
        }
        Ok(())
    }

    /// Returns the value of a single field.
    pub fn get(&self, field: InfoField) -> &str {
        match field {
            InfoField::Uuid => &self.uuid,
            InfoField::Name => &self.name,
            InfoField::Icon => &self.icon,
            InfoField::Rdns => &self.rdns,
        }
    }

    /// Serializes to the JSON shape wallets put on the wire.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "uuid": self.uuid,
            "name": self.name,
            "icon": self.icon,
            "rdns": self.rdns,
        })
    }
}

/// The four fields of a [`ProviderInfo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoField {
    /// `uuid`
    Uuid,
    /// `name`
    Name,
    /// `icon`
    Icon,
    /// `rdns`
    Rdns,
}

impl InfoField {
    /// Every field, in wire order.
    pub const ALL: [InfoField; 4] = [
        InfoField::Uuid,
        InfoField::Name,
        InfoField::Icon,
        InfoField::Rdns,
    ];

    /// JSON key of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoField::Uuid => "uuid",
            InfoField::Name => "name",
            InfoField::Icon => "icon",
            InfoField::Rdns => "rdns",
        }
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
