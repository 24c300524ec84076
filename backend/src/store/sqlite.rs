use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::cart::{CartItem, ShoppingCart};
use crate::models::menu_item::{MenuItem, MenuItemCreate};
use crate::models::user::User;

/// SQLite-backed persistence for users, roles, menu items and carts.
pub struct Store {
    conn: Mutex<Connection>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("IO error: {0}")]
    Io(String),
}

fn menu_item_from_row(row: &rusqlite::Row) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        special_tag: row.get(3)?,
        category: row.get(4)?,
        price: row.get(5)?,
        image: row.get(6)?,
    })
}

impl Store {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        // Parse sqlite: prefix if present
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        // Create parent directories if needed
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        // Storage-layer backstop for the read-then-insert uniqueness check.
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(LOWER(username))",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS roles (
                name TEXT PRIMARY KEY
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_roles (
                user_id TEXT NOT NULL,
                role_name TEXT NOT NULL,
                PRIMARY KEY (user_id, role_name),
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (role_name) REFERENCES roles(name)
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS menu_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                special_tag TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL,
                image TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS carts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL UNIQUE
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS cart_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cart_id INTEGER NOT NULL,
                menu_item_id INTEGER NOT NULL,
                quantity INTEGER NOT NULL,
                FOREIGN KEY (cart_id) REFERENCES carts(id),
                FOREIGN KEY (menu_item_id) REFERENCES menu_items(id)
            )",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cart_items_cart_id ON cart_items(cart_id)",
            [],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("Store initialized with database: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Case-insensitive username lookup.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let row: Option<(String, String, String, String, String, String)> = conn
            .query_row(
                "SELECT id, username, email, name, password_hash, created_at
                 FROM users WHERE LOWER(username) = LOWER(?1)",
                params![username],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.map(|(id, username, email, name, password_hash, created_at)| User {
            id,
            username,
            email,
            name,
            password_hash,
            created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        }))
    }

    pub fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO users (id, username, email, name, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.username,
                user.email,
                user.name,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!("Created user: {}", user.username);
        Ok(())
    }

    pub fn role_exists(&self, name: &str) -> Result<bool, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM roles WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    pub fn insert_role(&self, name: &str) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT OR IGNORE INTO roles (name) VALUES (?1)",
            params![name],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!("Created role: {}", name);
        Ok(())
    }

    pub fn list_roles(&self) -> Result<Vec<String>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare("SELECT name FROM roles ORDER BY name")
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let roles = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(roles)
    }

    pub fn assign_role(&self, user_id: &str, role_name: &str) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT OR IGNORE INTO user_roles (user_id, role_name) VALUES (?1, ?2)",
            params![user_id, role_name],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Roles in assignment order; token issuance uses only the first.
    pub fn roles_for_user(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare("SELECT role_name FROM user_roles WHERE user_id = ?1 ORDER BY rowid")
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let roles = stmt
            .query_map(params![user_id], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(roles)
    }

    pub fn list_menu_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, name, description, special_tag, category, price, image
                 FROM menu_items ORDER BY id",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let items = stmt
            .query_map([], menu_item_from_row)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<MenuItem>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(items)
    }

    pub fn get_menu_item(&self, id: i64) -> Result<Option<MenuItem>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.query_row(
            "SELECT id, name, description, special_tag, category, price, image
             FROM menu_items WHERE id = ?1",
            params![id],
            menu_item_from_row,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Insert an item and return it with the storage-assigned id.
    pub fn insert_menu_item(&self, item: MenuItemCreate) -> Result<MenuItem, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO menu_items (name, description, special_tag, category, price, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.name,
                item.description,
                item.special_tag,
                item.category,
                item.price,
                item.image,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let id = conn.last_insert_rowid();
        tracing::debug!("Created menu item {}: {}", id, item.name);
        Ok(MenuItem::from_create(id, item))
    }

    pub fn update_menu_item(&self, item: &MenuItem) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "UPDATE menu_items
             SET name = ?1, description = ?2, special_tag = ?3, category = ?4,
                 price = ?5, image = ?6
             WHERE id = ?7",
            params![
                item.name,
                item.description,
                item.special_tag,
                item.category,
                item.price,
                item.image,
                item.id,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    pub fn delete_menu_item(&self, id: i64) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute("DELETE FROM menu_items WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!("Deleted menu item {}", id);
        Ok(())
    }

    /// The user's cart with items and embedded menu items, total computed.
    pub fn get_cart(&self, user_id: &str) -> Result<Option<ShoppingCart>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let cart: Option<i64> = conn
            .query_row(
                "SELECT id FROM carts WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some(cart_id) = cart else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare(
                "SELECT ci.id, ci.quantity,
                        m.id, m.name, m.description, m.special_tag, m.category, m.price, m.image
                 FROM cart_items ci
                 JOIN menu_items m ON m.id = ci.menu_item_id
                 WHERE ci.cart_id = ?1
                 ORDER BY ci.id",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let cart_items = stmt
            .query_map(params![cart_id], |row| {
                Ok(CartItem {
                    id: row.get(0)?,
                    quantity: row.get(1)?,
                    menu_item_id: row.get(2)?,
                    menu_item: MenuItem {
                        id: row.get(2)?,
                        name: row.get(3)?,
                        description: row.get(4)?,
                        special_tag: row.get(5)?,
                        category: row.get(6)?,
                        price: row.get(7)?,
                        image: row.get(8)?,
                    },
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<CartItem>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Some(
            ShoppingCart {
                id: cart_id,
                user_id: user_id.to_string(),
                cart_items,
                cart_total: 0.0,
            }
            .with_total(),
        ))
    }

    /// Create an empty cart for the user and return its id.
    pub fn create_cart(&self, user_id: &str) -> Result<i64, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute("INSERT INTO carts (user_id) VALUES (?1)", params![user_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    }

    pub fn add_cart_item(
        &self,
        cart_id: i64,
        menu_item_id: i64,
        quantity: i64,
    ) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO cart_items (cart_id, menu_item_id, quantity) VALUES (?1, ?2, ?3)",
            params![cart_id, menu_item_id, quantity],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    pub fn set_cart_item_quantity(
        &self,
        cart_item_id: i64,
        quantity: i64,
    ) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute(
            "UPDATE cart_items SET quantity = ?1 WHERE id = ?2",
            params![quantity, cart_item_id],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    pub fn remove_cart_item(&self, cart_item_id: i64) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute("DELETE FROM cart_items WHERE id = ?1", params![cart_item_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    pub fn delete_cart(&self, cart_id: i64) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.execute("DELETE FROM cart_items WHERE cart_id = ?1", params![cart_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        conn.execute("DELETE FROM carts WHERE id = ?1", params![cart_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Store {
        Store::new(":memory:").unwrap()
    }

    fn spring_roll() -> MenuItemCreate {
        MenuItemCreate {
            name: "Spring Roll".to_string(),
            description: "Crispy vegetable rolls".to_string(),
            special_tag: String::new(),
            category: "Appetizer".to_string(),
            price: 7.99,
            image: String::new(),
        }
    }

    #[test]
    fn test_user_lookup_is_case_insensitive() {
        let store = test_store();
        let user = User::new("Mario@Example.com", "Mario", "hash".to_string());
        store.insert_user(&user).unwrap();

        let found = store.find_user_by_username("mario@example.com").unwrap();
        assert_eq!(found.unwrap().id, user.id);
    }

    #[test]
    fn test_missing_user_is_none() {
        let store = test_store();
        assert!(store.find_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected_by_index() {
        let store = test_store();
        store
            .insert_user(&User::new("mario@example.com", "Mario", "hash".to_string()))
            .unwrap();

        let result = store.insert_user(&User::new(
            "MARIO@example.com",
            "Impostor",
            "hash".to_string(),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_bootstrap_and_assignment() {
        let store = test_store();
        assert!(!store.role_exists("Admin").unwrap());

        store.insert_role("Admin").unwrap();
        store.insert_role("Customer").unwrap();
        assert!(store.role_exists("Admin").unwrap());
        assert_eq!(store.list_roles().unwrap().len(), 2);

        let user = User::new("mario@example.com", "Mario", "hash".to_string());
        store.insert_user(&user).unwrap();
        store.assign_role(&user.id, "Customer").unwrap();
        assert_eq!(store.roles_for_user(&user.id).unwrap(), vec!["Customer"]);
    }

    #[test]
    fn test_insert_role_is_idempotent() {
        let store = test_store();
        store.insert_role("Admin").unwrap();
        store.insert_role("Admin").unwrap();
        assert_eq!(store.list_roles().unwrap(), vec!["Admin"]);
    }

    #[test]
    fn test_menu_item_crud() {
        let store = test_store();
        let created = store.insert_menu_item(spring_roll()).unwrap();
        assert!(created.id > 0);

        let fetched = store.get_menu_item(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);

        let mut updated = fetched.clone();
        updated.price = 8.99;
        store.update_menu_item(&updated).unwrap();
        assert_eq!(store.get_menu_item(created.id).unwrap().unwrap().price, 8.99);

        store.delete_menu_item(created.id).unwrap();
        assert!(store.get_menu_item(created.id).unwrap().is_none());
    }

    #[test]
    fn test_list_menu_items_ordered_by_id() {
        let store = test_store();
        let first = store.insert_menu_item(spring_roll()).unwrap();
        let mut second_dto = spring_roll();
        second_dto.name = "Pad Thai".to_string();
        let second = store.insert_menu_item(second_dto).unwrap();

        let items = store.list_menu_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, first.id);
        assert_eq!(items[1].id, second.id);
    }

    #[test]
    fn test_cart_round_trip() {
        let store = test_store();
        let item = store.insert_menu_item(spring_roll()).unwrap();

        assert!(store.get_cart("user-1").unwrap().is_none());

        let cart_id = store.create_cart("user-1").unwrap();
        store.add_cart_item(cart_id, item.id, 2).unwrap();

        let cart = store.get_cart("user-1").unwrap().unwrap();
        assert_eq!(cart.id, cart_id);
        assert_eq!(cart.cart_items.len(), 1);
        assert_eq!(cart.cart_items[0].quantity, 2);
        assert_eq!(cart.cart_items[0].menu_item.name, "Spring Roll");
        assert_eq!(cart.cart_total, 2.0 * 7.99);

        store
            .set_cart_item_quantity(cart.cart_items[0].id, 5)
            .unwrap();
        let cart = store.get_cart("user-1").unwrap().unwrap();
        assert_eq!(cart.cart_items[0].quantity, 5);

        store.delete_cart(cart_id).unwrap();
        assert!(store.get_cart("user-1").unwrap().is_none());
    }

    #[test]
    fn test_database_file_persists_between_stores() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}/data/tavola.db", dir.path().display());

        {
            let store = Store::new(&url).unwrap();
            store
                .insert_user(&User::new("mario@example.com", "Mario", "hash".to_string()))
                .unwrap();
        }

        let store = Store::new(&url).unwrap();
        assert!(store
            .find_user_by_username("mario@example.com")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_remove_cart_item_leaves_cart() {
        let store = test_store();
        let item = store.insert_menu_item(spring_roll()).unwrap();
        let cart_id = store.create_cart("user-1").unwrap();
        store.add_cart_item(cart_id, item.id, 1).unwrap();

        let cart = store.get_cart("user-1").unwrap().unwrap();
        store.remove_cart_item(cart.cart_items[0].id).unwrap();

        let cart = store.get_cart("user-1").unwrap().unwrap();
        assert!(cart.cart_items.is_empty());
        assert_eq!(cart.cart_total, 0.0);
    }
}
