use serde::{Deserialize, Serialize};

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub special_tag: String,
    pub category: String,
    pub price: f64,
    pub image: String,
}

/// Body of POST /api/MenuItem. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub special_tag: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

/// Body of PUT /api/MenuItem/{id}. Carries the id so the handler can check
/// it against the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub special_tag: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

impl MenuItem {
    /// Map a create request onto a full item with the storage-assigned id.
    pub fn from_create(id: i64, dto: MenuItemCreate) -> Self {
        Self {
            id,
            name: dto.name,
            description: dto.description,
            special_tag: dto.special_tag,
            category: dto.category,
            price: dto.price,
            image: dto.image,
        }
    }
}

impl From<MenuItemUpdate> for MenuItem {
    fn from(dto: MenuItemUpdate) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            special_tag: dto.special_tag,
            category: dto.category,
            price: dto.price,
            image: dto.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> MenuItemCreate {
        MenuItemCreate {
            name: "Spring Roll".to_string(),
            description: "Crispy vegetable rolls".to_string(),
            special_tag: String::new(),
            category: "Appetizer".to_string(),
            price: 7.99,
            image: "https://example.com/spring-roll.png".to_string(),
        }
    }

    #[test]
    fn test_from_create_keeps_fields() {
        let item = MenuItem::from_create(42, create_dto());
        assert_eq!(item.id, 42);
        assert_eq!(item.name, "Spring Roll");
        assert_eq!(item.category, "Appetizer");
        assert_eq!(item.price, 7.99);
    }

    #[test]
    fn test_update_dto_maps_to_item() {
        let dto = MenuItemUpdate {
            id: 3,
            name: "Pad Thai".to_string(),
            description: String::new(),
            special_tag: "Chef's Special".to_string(),
            category: "Entree".to_string(),
            price: 12.5,
            image: String::new(),
        };
        let item = MenuItem::from(dto);
        assert_eq!(item.id, 3);
        assert_eq!(item.special_tag, "Chef's Special");
    }

    #[test]
    fn test_create_dto_optional_fields_default() {
        let dto: MenuItemCreate =
            serde_json::from_str(r#"{"name": "Soup", "category": "Appetizer", "price": 4.5}"#)
                .unwrap();
        assert!(dto.description.is_empty());
        assert!(dto.special_tag.is_empty());
        assert!(dto.image.is_empty());
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = MenuItem::from_create(1, create_dto());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"specialTag\""));
        assert!(!json.contains("special_tag"));
    }
}
