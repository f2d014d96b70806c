//! Identity validation for announced providers.
//!
//! [`is_valid_provider_detail`] is the gate every announcement passes before
//! application code sees it. It is total: malformed input yields `false`,
//! never a panic.

use serde_json::Value;

use crate::constants::{
    ICON_DATA_URI_PREFIX, NIL_UUID, RDNS_LABEL_MAX_LENGTH, RDNS_MAX_LENGTH, RDNS_MIN_LENGTH,
    RDNS_TLD_MIN_LENGTH, UUID_LENGTH,
};
use crate::error::{ConnectError, Result};
use crate::types::{DetailValue, InfoField, ProviderDetail, ProviderInfo, ProviderSlot};

// ═══════════════════════════════════════════════════════════════════════════════
// FIELD RULES
// ═══════════════════════════════════════════════════════════════════════════════

/// Lowercase hyphenated v4 UUID, or the all-zero UUID.
pub fn is_valid_uuid(uuid: &str) -> bool {
    if uuid == NIL_UUID {
        return true;
    }

    let bytes = uuid.as_bytes();
    if bytes.len() != UUID_LENGTH {
        return false;
    }

    bytes.iter().enumerate().all(|(i, &b)| match i {
        8 | 13 | 18 | 23 => b == b'-',
        14 => b == b'4',
        _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
    })
}

/// Any non-empty string.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
}

/// Must start with an image data URI prefix.
pub fn is_valid_icon(icon: &str) -> bool {
    icon.starts_with(ICON_DATA_URI_PREFIX)
}

/// Fully-qualified-domain-name shape, e.g. `com.example.wallet`.
///
/// At least two dot-separated labels. Inner labels are 1-63 ASCII
/// alphanumerics or hyphens and neither start nor end with a hyphen; the
/// last label is 2-63 ASCII letters.
pub fn is_valid_rdns(rdns: &str) -> bool {
    if !(RDNS_MIN_LENGTH..=RDNS_MAX_LENGTH).contains(&rdns.len()) {
        return false;
    }

    let Some((labels, tld)) = rdns.rsplit_once('.') else {
        return false;
    };

    let tld_ok = (RDNS_TLD_MIN_LENGTH..=RDNS_LABEL_MAX_LENGTH).contains(&tld.len())
        && tld.bytes().all(|b| b.is_ascii_alphabetic());

    tld_ok && labels.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
        return false;
    };

    bytes.len() <= RDNS_LABEL_MAX_LENGTH
        && first != b'-'
        && last.is_ascii_alphanumeric()
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Checks one identity field against its rule.
pub fn check_field(field: InfoField, value: &str) -> Result<()> {
    let (ok, rule) = match field {
        InfoField::Uuid => (is_valid_uuid(value), "must be a v4 UUID or the nil UUID"),
        InfoField::Name => (is_valid_name(value), "must not be empty"),
        InfoField::Icon => (is_valid_icon(value), "must be an image data URI"),
        InfoField::Rdns => (is_valid_rdns(value), "must be a reverse domain name"),
    };

    if ok {
        Ok(())
    } else {
        Err(ConnectError::InvalidProviderInfo {
            field,
            reason: rule.into(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETAIL VALIDATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Validates an announced detail and returns its typed form.
///
/// Fails if the detail, its `info`, or its `provider` is not an object, if the
/// provider does not implement the capability interface, or if any identity
/// field breaks its rule.
pub fn check_provider_detail(value: &DetailValue) -> Result<ProviderDetail> {
    let raw = match value {
        DetailValue::Record(raw) => raw,
        DetailValue::Json(json) => {
            return Err(ConnectError::InvalidProviderDetail(format!(
                "expected a provider detail record, got {}",
                describe(json)
            )))
        }
    };

    if !raw.info.is_object() {
        return Err(ConnectError::InvalidProviderDetail(format!(
            "info must be an object, got {}",
            describe(&raw.info)
        )));
    }

    let provider = match &raw.provider {
        ProviderSlot::Handle(handle) => handle.clone(),
        ProviderSlot::Value(json) => {
            return Err(ConnectError::InvalidProviderDetail(format!(
                "provider must implement the wallet provider interface, got {}",
                describe(json)
            )))
        }
    };

    let info = ProviderInfo::from_value(&raw.info)?;
    Ok(ProviderDetail::new(info, provider))
}

/// Whether a value is a well-formed provider detail.
pub fn is_valid_provider_detail(value: &DetailValue) -> bool {
    check_provider_detail(value).is_ok()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a plain object",
    }
}
