use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Identifier of a store document, assigned on insert and immutable after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(Uuid);

impl StoreId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StoreId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

/// Weak reference to an owner record. The relation is lookup-only: nothing
/// here checks that the owner exists, and deleting a store never cascades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OwnerId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

/// A store document. Every attribute except `id` and `created_at` is
/// optional; absent fields are omitted from the serialized form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    /// Opaque schedule blob; stored and returned verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a store. Unknown keys are rejected at
/// deserialization instead of being merged in untyped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStore {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<OwnerId>,
    pub operating_hours: Option<serde_json::Value>,
    pub website: Option<String>,
}

/// Partial update: only supplied fields change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorePatch {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<OwnerId>,
    pub operating_hours: Option<serde_json::Value>,
    pub website: Option<String>,
}

/// Query filter for listing stores; both fields optional, AND semantics.
#[derive(Clone, Debug, Default)]
pub struct StoreFilter {
    /// Case-insensitive substring match on `name`.
    pub name: Option<String>,
    pub owner: Option<OwnerId>,
}

impl StoreFilter {
    pub fn matches(&self, store: &Store) -> bool {
        if let Some(needle) = &self.name {
            let needle = needle.to_lowercase();
            let hit = store
                .name
                .as_deref()
                .map(|n| n.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }
        if let Some(owner) = self.owner {
            if store.owner_id != Some(owner) {
                return false;
            }
        }
        true
    }
}

impl Store {
    /// Build a fresh document from create input, assigning id and timestamp.
    pub fn from_new(input: NewStore) -> Self {
        Self {
            id: StoreId::new(),
            name: input.name,
            street: input.street,
            city: input.city,
            state: input.state,
            zip_code: input.zip_code,
            phone_number: input.phone_number,
            email: input.email,
            owner_id: input.owner_id,
            operating_hours: input.operating_hours,
            website: input.website,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place. Absent patch fields leave the
    /// current value unchanged.
    pub fn apply(&mut self, patch: StorePatch) {
        if let Some(v) = patch.name { self.name = Some(v); }
        if let Some(v) = patch.street { self.street = Some(v); }
        if let Some(v) = patch.city { self.city = Some(v); }
        if let Some(v) = patch.state { self.state = Some(v); }
        if let Some(v) = patch.zip_code { self.zip_code = Some(v); }
        if let Some(v) = patch.phone_number { self.phone_number = Some(v); }
        if let Some(v) = patch.email { self.email = Some(v); }
        if let Some(v) = patch.owner_id { self.owner_id = Some(v); }
        if let Some(v) = patch.operating_hours { self.operating_hours = Some(v); }
        if let Some(v) = patch.website { self.website = Some(v); }
    }

    /// Schema validation. Runs on insert and on the merged result of an
    /// update, so a patch can never leave an invalid document behind.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ModelError::Validation("name must not be blank".into()));
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(website) = &self.website {
            if !(website.starts_with("http://") || website.starts_with("https://")) {
                return Err(ModelError::Validation("website must start with http(s)".into()));
            }
        }
        if let Some(zip) = &self.zip_code {
            validate_zip_code(zip)?;
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), ModelError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

fn validate_zip_code(zip: &str) -> Result<(), ModelError> {
    let ok = !zip.is_empty()
        && zip.chars().all(|c| c.is_ascii_digit() || c == '-')
        && zip.chars().any(|c| c.is_ascii_digit());
    if !ok {
        return Err(ModelError::Validation("invalid zip_code".into()));
    }
    Ok(())
}
