use crate::model::{EntityDescriptor, ResourceId};

/// How a controller was mounted, derived from the page's query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No identifier: the full collection.
    List,
    /// A single record loaded into the form.
    Edit(ResourceId),
    /// The collection filtered by `param` (ratings of one clinic).
    Scoped {
        param: &'static str,
        value: ResourceId,
    },
}

/// Returns the raw value of `key` in a query string. Accepts a bare query
/// (`?id=7` or `id=7`) or a full URL. The value is neither decoded nor
/// validated; an empty value counts as absent.
pub fn query_value<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    let query = match query.split_once('?') {
        Some((_, rest)) => rest,
        None if query.contains("://") => return None,
        None => query,
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

pub fn mode_from_query(descriptor: &EntityDescriptor, query: &str) -> Mode {
    if let Some(param) = descriptor.scope_param {
        if let Some(value) = query_value(query, param) {
            return Mode::Scoped {
                param,
                value: ResourceId::new(value),
            };
        }
    }
    match query_value(query, descriptor.id_param) {
        Some(value) => Mode::Edit(ResourceId::new(value)),
        None => Mode::List,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clinic, Entity, Rating};

    #[test]
    fn extracts_raw_identifier() {
        assert_eq!(query_value("?id=42", "id"), Some("42"));
        assert_eq!(query_value("?x=1&id=a%20b", "id"), Some("a%20b"));
        assert_eq!(
            query_value("https://site/clinica-edit.html?id=9#top", "id"),
            Some("9")
        );
    }

    #[test]
    fn key_must_match_exactly() {
        assert_eq!(query_value("?id_clinica=12", "id"), None);
        assert_eq!(query_value("?id=", "id"), None);
        assert_eq!(query_value("https://site/clinicas.html", "id"), None);
        assert_eq!(query_value("", "id"), None);
    }

    #[test]
    fn mode_selection() {
        assert_eq!(mode_from_query(&Clinic::DESCRIPTOR, ""), Mode::List);
        assert_eq!(
            mode_from_query(&Clinic::DESCRIPTOR, "?id=7"),
            Mode::Edit(ResourceId::from(7))
        );
        assert_eq!(
            mode_from_query(&Rating::DESCRIPTOR, "?id_clinica=12"),
            Mode::Scoped {
                param: "id_clinica",
                value: ResourceId::from(12)
            }
        );
        // clinics have no scoped view
        assert_eq!(mode_from_query(&Clinic::DESCRIPTOR, "?id_clinica=12"), Mode::List);
    }
}
