#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, is_foreign_key_violation, is_unique_violation};
use rusqlite::{OptionalExtension, params};
use todo_core::validate::validate_category_name;
use todo_core::{Category, CategoryRef};

/// A category together with how many tasks point at it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryUsage {
    pub category: Category,
    pub total: i64,
    pub completed: i64,
}

impl SqliteStore {
    pub fn create_category(&mut self, name: &str) -> Result<Category, StoreError> {
        let name = validate_category_name(name)?;
        let insert = self
            .conn
            .execute("INSERT INTO categories(name) VALUES (?1)", params![name]);
        match insert {
            Ok(_) => Ok(Category {
                id: self.conn.last_insert_rowid(),
                name,
            }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::CategoryExists),
            Err(err) => Err(err.into()),
        }
    }

    pub fn category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id=?1",
                params![id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE name=?1",
                params![name.trim()],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id")?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            });
        }
        Ok(out)
    }

    pub fn rename_category(&mut self, id: i64, name: &str) -> Result<Category, StoreError> {
        let name = validate_category_name(name)?;
        let updated = self.conn.execute(
            "UPDATE categories SET name=?1 WHERE id=?2",
            params![name, id],
        );
        match updated {
            Ok(0) => Err(StoreError::UnknownId),
            Ok(_) => Ok(Category { id, name }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::CategoryExists),
            Err(err) => Err(err.into()),
        }
    }

    /// Deleting is refused while tasks still reference the category.
    pub fn delete_category(&mut self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let exists = tx
            .query_row("SELECT 1 FROM categories WHERE id=?1", params![id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::UnknownId);
        }
        let in_use = tx.query_row(
            "SELECT COUNT(1) FROM tasks WHERE category_id=?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )?;
        if in_use > 0 {
            return Err(StoreError::CategoryInUse);
        }
        match tx.execute("DELETE FROM categories WHERE id=?1", params![id]) {
            Ok(_) => {}
            Err(err) if is_foreign_key_violation(&err) => return Err(StoreError::CategoryInUse),
            Err(err) => return Err(err.into()),
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_or_create_category(&mut self, name: &str) -> Result<Category, StoreError> {
        let name = validate_category_name(name)?;
        if let Some(existing) = self.category_by_name(&name)? {
            return Ok(existing);
        }
        self.create_category(&name)
    }

    pub fn resolve_category(&self, category: &CategoryRef) -> Result<i64, StoreError> {
        let found = match category {
            CategoryRef::Id(id) => self.category(*id)?,
            CategoryRef::Name(name) => self.category_by_name(name)?,
        };
        found
            .map(|category| category.id)
            .ok_or(StoreError::UnknownCategory)
    }

    pub fn category_usage(&self) -> Result<Vec<CategoryUsage>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, COUNT(t.id), \
                    COALESCE(SUM(CASE WHEN t.status='completada' THEN 1 ELSE 0 END), 0) \
             FROM categories c \
             LEFT JOIN tasks t ON t.category_id = c.id \
             GROUP BY c.id, c.name \
             ORDER BY c.id",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(CategoryUsage {
                category: Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                },
                total: row.get(2)?,
                completed: row.get(3)?,
            });
        }
        Ok(out)
    }
}
