//! 任务仓储

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::TaskRepositoryTrait;
use crate::error::Result;
use crate::models::{Task, TaskDraft, TaskFilter};

const TASK_COLUMNS: &str = "id, title, description, reward, deadline, difficulty, is_featured, \
                            example_photo, is_active, created_at";

/// 过滤条件：难度、推荐、关键词（$1..$3）
const ACTIVE_FILTER: &str = r#"
    is_active = TRUE
    AND ($1::varchar IS NULL OR difficulty = $1)
    AND ($2::boolean = FALSE OR is_featured = TRUE)
    AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
"#;

pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 分页列出在架任务
    ///
    /// 排序子句来自 TaskSort 白名单，不拼接用户输入
    pub async fn list_active(
        &self,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Task>, i64)> {
        let pattern = filter.search_pattern();

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY {} LIMIT $4 OFFSET $5",
            TASK_COLUMNS,
            ACTIVE_FILTER,
            filter.sort.order_by()
        ))
        .bind(filter.difficulty)
        .bind(filter.featured_only)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM tasks WHERE {}",
            ACTIVE_FILTER
        ))
        .bind(filter.difficulty)
        .bind(filter.featured_only)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((tasks, total))
    }

    pub async fn get_active(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND is_active = TRUE",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// 在事务中读取任务（审核时需要标题和奖励）
    pub async fn get_in_tx(tx: &mut PgConnection, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(tx)
        .await?;

        Ok(task)
    }

    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {} FROM tasks
            WHERE is_active = TRUE
            ORDER BY is_featured DESC, created_at DESC, id DESC
            LIMIT $1
            "#,
            TASK_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, reward, deadline, difficulty, is_featured, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.reward)
        .bind(draft.deadline)
        .bind(draft.difficulty)
        .bind(draft.is_featured)
        .bind(draft.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn update(&self, id: i64, draft: &TaskDraft) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, reward = $4, deadline = $5,
                difficulty = $6, is_featured = $7, is_active = $8
            WHERE id = $1
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.reward)
        .bind(draft.deadline)
        .bind(draft.difficulty)
        .bind(draft.is_featured)
        .bind(draft.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// 设置示例图片（上传后回写路径）
    pub async fn set_example_photo(&self, id: i64, photo: &str) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET example_photo = $2 WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(photo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }
}

#[async_trait]
impl TaskRepositoryTrait for TaskRepository {
    async fn list_active(
        &self,
        filter: &TaskFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Task>, i64)> {
        self.list_active(filter, limit, offset).await
    }

    async fn get_active(&self, id: i64) -> Result<Option<Task>> {
        self.get_active(id).await
    }

    async fn get(&self, id: i64) -> Result<Option<Task>> {
        self.get(id).await
    }

    async fn list_featured(&self, limit: i64) -> Result<Vec<Task>> {
        self.list_featured(limit).await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        self.create(draft).await
    }

    async fn update(&self, id: i64, draft: &TaskDraft) -> Result<Option<Task>> {
        self.update(id, draft).await
    }

    async fn set_example_photo(&self, id: i64, photo: &str) -> Result<Option<Task>> {
        self.set_example_photo(id, photo).await
    }
}
