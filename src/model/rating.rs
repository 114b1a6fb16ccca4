use std::fmt;

use serde::{Deserialize, Serialize};

use super::{format_optional_id, null_as_default};
use super::{Entity, EntityDescriptor};

/// What a rating scores. Tags outside the known set are kept verbatim so a
/// list never fails on a value this client does not know about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RatingKind {
    Facilities,
    Medical,
    Service,
    Other(String),
}

impl RatingKind {
    pub const KNOWN: &'static [&'static str] = &["instalaciones", "medicos", "servicio"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Facilities => "instalaciones",
            Self::Medical => "medicos",
            Self::Service => "servicio",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for RatingKind {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "instalaciones" => Self::Facilities,
            "medicos" | "médicos" => Self::Medical,
            "servicio" => Self::Service,
            _ => Self::Other(value),
        }
    }
}

impl From<RatingKind> for String {
    fn from(value: RatingKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "tipo")]
    pub kind: Option<RatingKind>,
    #[serde(rename = "valor", deserialize_with = "null_as_default")]
    pub value: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub id_user: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub id_clinica: i64,
}

const RATING_FIELDS: &[&str] = &["tipo", "valor", "id_user", "id_clinica"];

impl Entity for Rating {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "rating",
        collection: "ratings",
        list_page: "ratings.html",
        default_title: "Ratings",
        search_title: "Ratings para la clínica con ID",
        search_error: "Error al buscar ratings.",
        id_param: "id",
        scope_param: Some("id_clinica"),
        create_fields: RATING_FIELDS,
        update_fields: RATING_FIELDS,
        read_only_fields: &[],
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Tipo", "Valor", "Usuario", "Clínica"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_optional_id(self.id),
            self.kind
                .as_ref()
                .map(|k| k.to_string())
                .unwrap_or_default(),
            self.value.to_string(),
            self.id_user.to_string(),
            self.id_clinica.to_string(),
        ]
    }
}
