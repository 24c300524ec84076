use serde::Serialize;

use super::menu_item::MenuItem;

/// A line in a shopping cart, with the referenced menu item embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub menu_item_id: i64,
    pub menu_item: MenuItem,
    pub quantity: i64,
}

/// Per-user shopping cart. The total is computed from the items, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    pub id: i64,
    pub user_id: String,
    pub cart_items: Vec<CartItem>,
    pub cart_total: f64,
}

impl ShoppingCart {
    /// Cart payload for a user that has no persisted cart yet.
    pub fn empty(user_id: &str) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            cart_items: Vec::new(),
            cart_total: 0.0,
        }
    }

    /// Recompute the total from the embedded items.
    pub fn with_total(mut self) -> Self {
        self.cart_total = self
            .cart_items
            .iter()
            .map(|item| item.quantity as f64 * item.menu_item.price)
            .sum();
        self
    }
}
