#![forbid(unsafe_code)]

use super::{
    SqliteStore, StoreError, TaskCreateRequest, TaskFilter, TaskSort, TaskUpdateRequest,
    is_constraint_violation, is_foreign_key_violation,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};
use todo_core::validate::{
    normalize_due_at, normalize_due_until, validate_estimated_minutes, validate_task_name,
};
use todo_core::{CategoryRef, Priority, Task, TaskStatus};

const TASK_COLUMNS: &str = "t.id, t.name, t.status, t.category_id, c.name, t.priority, \
     t.due_at, t.estimated_minutes, t.completed_at_ms, t.created_at_ms, t.updated_at_ms";

impl SqliteStore {
    pub fn create_task(&mut self, request: TaskCreateRequest) -> Result<Task, StoreError> {
        let name = validate_task_name(&request.name)?;
        let category_id = self.resolve_category(&request.category)?;
        let due_at = match request.due_at.as_deref() {
            Some(raw) => normalize_due_at(raw)?,
            None => None,
        };
        let estimated_minutes = request
            .estimated_minutes
            .map(validate_estimated_minutes)
            .transpose()?;
        let status = request.status.unwrap_or_default();
        let priority = request.priority.unwrap_or_default();
        let completed_at_ms = status.is_completed().then_some(request.now_ms);

        let insert = self.conn.execute(
            "INSERT INTO tasks(name, status, category_id, priority, due_at, estimated_minutes, \
                               completed_at_ms, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                name,
                status.as_str(),
                category_id,
                priority.as_str(),
                due_at,
                estimated_minutes,
                completed_at_ms,
                request.now_ms,
            ],
        );
        if let Err(err) = insert {
            return Err(map_task_write_error(err));
        }

        let id = self.conn.last_insert_rowid();
        self.task(id)?.ok_or(StoreError::UnknownId)
    }

    pub fn task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t \
             JOIN categories c ON c.id = t.category_id \
             WHERE t.id=?1"
        );
        let task = self
            .conn
            .query_row(&sql, params![id], task_from_row)
            .optional()?;
        Ok(task)
    }

    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let mut sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t \
             JOIN categories c ON c.id = t.category_id \
             WHERE 1=1"
        );
        let mut args: Vec<SqlValue> = Vec::new();
        if let Some(status) = filter.status {
            args.push(SqlValue::Text(status.as_str().to_string()));
            sql.push_str(&format!(" AND t.status=?{}", args.len()));
        }
        if let Some(category_id) = filter.category_id {
            args.push(SqlValue::Integer(category_id));
            sql.push_str(&format!(" AND t.category_id=?{}", args.len()));
        }
        if let Some(priority) = filter.priority {
            args.push(SqlValue::Text(priority.as_str().to_string()));
            sql.push_str(&format!(" AND t.priority=?{}", args.len()));
        }
        if let Some(text) = filter.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            args.push(SqlValue::Text(format!("%{}%", escape_like(text))));
            sql.push_str(&format!(" AND t.name LIKE ?{} ESCAPE '\\'", args.len()));
        }
        if let Some(from) = filter.due_from.as_deref().map(normalize_due_at).transpose()?.flatten() {
            args.push(SqlValue::Text(from));
            sql.push_str(&format!(" AND t.due_at >= ?{}", args.len()));
        }
        if let Some(until) = filter
            .due_until
            .as_deref()
            .map(normalize_due_until)
            .transpose()?
            .flatten()
        {
            args.push(SqlValue::Text(until));
            sql.push_str(&format!(" AND t.due_at <= ?{}", args.len()));
        }
        let direction = if filter.descending { "DESC" } else { "ASC" };
        // Tasks without a due date sort last either way; ties fall back to id.
        let nulls_last = if filter.sort == TaskSort::Due {
            "t.due_at IS NULL, "
        } else {
            ""
        };
        sql.push_str(&format!(
            " ORDER BY {nulls_last}{} {direction}, t.id",
            filter.sort.order_by()
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(args))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(task_from_row(row)?);
        }
        Ok(out)
    }

    pub fn rename_task(&mut self, id: i64, name: &str, now_ms: i64) -> Result<Task, StoreError> {
        self.update_task(
            id,
            TaskUpdateRequest {
                name: Some(name.to_string()),
                ..TaskUpdateRequest::default()
            },
            now_ms,
        )
    }

    pub fn set_status(
        &mut self,
        id: i64,
        status: TaskStatus,
        now_ms: i64,
    ) -> Result<Task, StoreError> {
        self.update_task(
            id,
            TaskUpdateRequest {
                status: Some(status),
                ..TaskUpdateRequest::default()
            },
            now_ms,
        )
    }

    pub fn toggle_status(&mut self, id: i64, now_ms: i64) -> Result<Task, StoreError> {
        let current = self.task(id)?.ok_or(StoreError::UnknownId)?;
        self.set_status(id, current.status.toggled(), now_ms)
    }

    pub fn move_to_category(
        &mut self,
        id: i64,
        category: CategoryRef,
        now_ms: i64,
    ) -> Result<Task, StoreError> {
        self.update_task(
            id,
            TaskUpdateRequest {
                category: Some(category),
                ..TaskUpdateRequest::default()
            },
            now_ms,
        )
    }

    /// Applies every present field in one statement. Status changes keep
    /// `completed_at_ms` in step: set when moving to completed, cleared otherwise.
    pub fn update_task(
        &mut self,
        id: i64,
        request: TaskUpdateRequest,
        now_ms: i64,
    ) -> Result<Task, StoreError> {
        let current = self.task(id)?.ok_or(StoreError::UnknownId)?;

        let name = match request.name.as_deref() {
            Some(raw) => validate_task_name(raw)?,
            None => current.name.clone(),
        };
        let category_id = match request.category.as_ref() {
            Some(category) => self.resolve_category(category)?,
            None => current.category_id,
        };
        let due_at = match request.due_at {
            Some(Some(raw)) => normalize_due_at(&raw)?,
            Some(None) => None,
            None => current.due_at.clone(),
        };
        let estimated_minutes = match request.estimated_minutes {
            Some(Some(value)) => Some(validate_estimated_minutes(value)?),
            Some(None) => None,
            None => current.estimated_minutes,
        };
        let priority = request.priority.unwrap_or(current.priority);
        let status = request.status.unwrap_or(current.status);
        let completed_at_ms = match (current.status.is_completed(), status.is_completed()) {
            (true, true) => current.completed_at_ms,
            (false, true) => Some(now_ms),
            (_, false) => None,
        };

        let updated = self.conn.execute(
            "UPDATE tasks SET name=?1, status=?2, category_id=?3, priority=?4, due_at=?5, \
                              estimated_minutes=?6, completed_at_ms=?7, updated_at_ms=?8 \
             WHERE id=?9",
            params![
                name,
                status.as_str(),
                category_id,
                priority.as_str(),
                due_at,
                estimated_minutes,
                completed_at_ms,
                now_ms,
                id,
            ],
        );
        match updated {
            Ok(0) => return Err(StoreError::UnknownId),
            Ok(_) => {}
            Err(err) => return Err(map_task_write_error(err)),
        }
        self.task(id)?.ok_or(StoreError::UnknownId)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id=?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }

    /// Backfills the completion timestamp of an already completed task.
    pub fn set_completed_at(&mut self, id: i64, completed_at_ms: i64) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE tasks SET completed_at_ms=?1 WHERE id=?2 AND status='completada'",
            params![completed_at_ms, id],
        )?;
        if updated == 0 {
            return Err(StoreError::UnknownId);
        }
        Ok(())
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status_raw: String = row.get(2)?;
    let priority_raw: String = row.get(5)?;
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        status: TaskStatus::parse(&status_raw).map_err(|err| invalid_column(2, err))?,
        category_id: row.get(3)?,
        category_name: row.get(4)?,
        priority: Priority::parse(&priority_raw).map_err(|err| invalid_column(5, err))?,
        due_at: row.get(6)?,
        estimated_minutes: row.get(7)?,
        completed_at_ms: row.get(8)?,
        created_at_ms: row.get(9)?,
        updated_at_ms: row.get(10)?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn invalid_column(index: usize, err: todo_core::ValidationError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}

fn map_task_write_error(err: rusqlite::Error) -> StoreError {
    if is_foreign_key_violation(&err) {
        return StoreError::UnknownCategory;
    }
    if is_constraint_violation(&err) {
        return StoreError::Integrity("task row rejected by a schema constraint");
    }
    StoreError::Sql(err)
}
