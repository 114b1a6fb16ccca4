use serde::{Deserialize, Serialize};

use super::{format_optional_id, null_as_default};
use super::{Entity, EntityDescriptor};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "imagen", deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(rename = "precio", deserialize_with = "null_as_default")]
    pub price: f64,
}

const PRODUCT_FIELDS: &[&str] = &["nombre", "precio", "stock", "imagen"];

impl Entity for Product {
    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "producto",
        collection: "productos",
        list_page: "productos.html",
        default_title: "Productos",
        search_title: "Productos cuyo nombre contiene ",
        search_error: "Error al buscar productos.",
        id_param: "id",
        scope_param: None,
        create_fields: PRODUCT_FIELDS,
        update_fields: PRODUCT_FIELDS,
        read_only_fields: &[],
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Nombre", "Stock", "Precio", "Imagen"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format_optional_id(self.id),
            self.name.clone(),
            self.stock.to_string(),
            format!("{:.2}", self.price),
            self.image.clone(),
        ]
    }
}
