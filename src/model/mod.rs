pub mod clinic;
pub mod product;
pub mod rating;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub use clinic::{AvgRatings, Clinic, FUNDING_KINDS};
pub use product::Product;
pub use rating::{Rating, RatingKind};

/// Static configuration that binds an entity type to its REST collection and
/// to the pages and messages of its views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Human name used in log lines.
    pub name: &'static str,
    pub collection: &'static str,
    /// Page the browser lands on after a successful write.
    pub list_page: &'static str,
    pub default_title: &'static str,
    /// Prefix of the title shown while a search filter is active.
    pub search_title: &'static str,
    pub search_error: &'static str,
    /// Query-string key carrying the identifier of the record being edited.
    pub id_param: &'static str,
    /// Query-string key of a scoped list view, served by `<collection>/filter`.
    pub scope_param: Option<&'static str>,
    pub create_fields: &'static [&'static str],
    pub update_fields: &'static [&'static str],
    /// Fields the server owns; form edits to them are rejected.
    pub read_only_fields: &'static [&'static str],
}

/// A record type managed by the generic resource controller.
///
/// The same type serves as a list row and as form state, so every field must
/// have a default and tolerate being absent from server payloads.
pub trait Entity:
    Serialize + DeserializeOwned + Default + Clone + fmt::Debug + Send + Sync + 'static
{
    const DESCRIPTOR: EntityDescriptor;

    fn id(&self) -> Option<i64>;

    /// Column headers of the list view, in display order.
    fn columns() -> &'static [&'static str];

    /// Cells of the list view, one per entry of [`Entity::columns`].
    fn cells(&self) -> Vec<String>;
}

/// Opaque identifier of a server record. It is never parsed or synthesized,
/// only appended to URLs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Deserializes `null` as the type's default. The backend serializes unset
/// columns as `null`, while form slots always hold a value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn format_optional_number(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

pub(crate) fn format_optional_id(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
