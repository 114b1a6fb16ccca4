use serde::{Deserialize, Serialize};

use super::{format_optional_id, format_optional_number, null_as_default};
use super::{Entity, EntityDescriptor};

/// Funding kinds the backend accepts for `financ`. Stored as free text.
pub const FUNDING_KINDS: &[&str] = &["publico", "privado", "mixto"];

/// Server-side aggregate of the ratings received by a clinic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvgRatings {
    #[serde(rename = "promedio_inst")]
    pub facility: Option<f64>,
    #[serde(rename = "promedio_medi")]
    pub medical: Option<f64>,
    #[serde(rename = "promedio_serv")]
    pub service: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clinic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "financ", deserialize_with = "null_as_default")]
    pub funding: String,
    #[serde(rename = "direccion", deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "localidad", deserialize_with = "null_as_default")]
    pub locality: String,
    #[serde(rename = "telefono", deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(rename = "imagen", deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avg_ratings: AvgRatings,
}

const CLINIC_FIELDS: &[&str] = &[
    "nombre",
    "financ",
    "direccion",
    "localidad",
    "telefono",
    "website",
    "imagen",
];

const CLINIC_CREATE_FIELDS: &[&str] = &[
    "nombre",
    "financ",
    "direccion",
    "localidad",
    "telefono",
    "website",
    "imagen",
    "avg_ratings",
];

impl Entity for Clinic {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "clinica",
        collection: "clinicas",
        list_page: "clinicas.html",
        default_title: "Clinicas",
        search_title: "Clínicas cuyo nombre contiene ",
        search_error: "Error al buscar clínicas.",
        id_param: "id",
        scope_param: None,
        create_fields: CLINIC_CREATE_FIELDS,
        update_fields: CLINIC_FIELDS,
        read_only_fields: &["avg_ratings"],
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> &'static [&'static str] {
        &[
            "ID",
            "Nombre",
            "Financiación",
            "Dirección",
            "Localidad",
            "Teléfono",
            "Instalaciones",
            "Médicos",
            "Servicio",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_optional_id(self.id),
            self.name.clone(),
            self.funding.clone(),
            self.address.clone(),
            self.locality.clone(),
            self.phone.clone(),
            format_optional_number(self.avg_ratings.facility),
            format_optional_number(self.avg_ratings.medical),
            format_optional_number(self.avg_ratings.service),
        ]
    }
}
