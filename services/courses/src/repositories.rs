//! Repositories for database operations

use common::error::DatabaseResult;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::models::{Course, CourseInput};

/// Course repository for database operations
///
/// Every method runs exactly one bound-parameter statement. `duration` is
/// read through `CAST(... AS REAL)` because the column has integer affinity
/// and may hold either storage class.
#[derive(Clone)]
pub struct CourseRepository {
    pool: SqlitePool,
}

impl CourseRepository {
    /// Create a new course repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a course and return it with its assigned id
    pub async fn create(&self, input: &CourseInput) -> DatabaseResult<Course> {
        let row = sqlx::query(
            r#"
            INSERT INTO courses (title, description, duration, instructor)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, description, CAST(duration AS REAL) AS duration, instructor
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.duration)
        .bind(&input.instructor)
        .fetch_one(&self.pool)
        .await?;

        Ok(course_from_row(&row)?)
    }

    /// List courses, optionally keeping only titles that contain `title_filter`
    /// (case-insensitive). An empty filter means no filter.
    pub async fn list(&self, title_filter: Option<&str>) -> DatabaseResult<Vec<Course>> {
        let rows = match title_filter.filter(|filter| !filter.is_empty()) {
            Some(filter) => {
                sqlx::query(
                    r#"
                    SELECT id, title, description, CAST(duration AS REAL) AS duration, instructor
                    FROM courses
                    WHERE instr(lower(title), lower(?)) > 0
                    "#,
                )
                .bind(filter)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, title, description, CAST(duration AS REAL) AS duration, instructor
                    FROM courses
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        let courses = rows
            .iter()
            .map(course_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    /// Find a course by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Course>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, CAST(duration AS REAL) AS duration, instructor
            FROM courses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(course_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Replace all four fields of a course; `None` when the id is unknown
    pub async fn update(&self, id: i64, input: &CourseInput) -> DatabaseResult<Option<Course>> {
        let row = sqlx::query(
            r#"
            UPDATE courses
            SET title = ?, description = ?, duration = ?, instructor = ?
            WHERE id = ?
            RETURNING id, title, description, CAST(duration AS REAL) AS duration, instructor
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.duration)
        .bind(&input.instructor)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(course_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Delete a course by ID, reporting whether a row was removed
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn course_from_row(row: &SqliteRow) -> Result<Course, sqlx::Error> {
    Ok(Course {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        duration: row.try_get("duration")?,
        instructor: row.try_get("instructor")?,
    })
}
