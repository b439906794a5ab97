//! 任务查询与管理服务
//!
//! 列表、详情只面向在架任务；创建与更新需要审核员身份。

use std::sync::Arc;

use tracing::{info, instrument};

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{Task, TaskDraft, TaskFilter};
use crate::repository::{SubmissionRepositoryTrait, TaskRepositoryTrait};
use crate::service::dto::{PageRequest, Paged, TASKS_PER_PAGE, TaskDetail};

pub struct TaskService<TR, SR>
where
    TR: TaskRepositoryTrait,
    SR: SubmissionRepositoryTrait,
{
    task_repo: Arc<TR>,
    submission_repo: Arc<SR>,
}

impl<TR, SR> TaskService<TR, SR>
where
    TR: TaskRepositoryTrait,
    SR: SubmissionRepositoryTrait,
{
    pub fn new(task_repo: Arc<TR>, submission_repo: Arc<SR>) -> Self {
        Self {
            task_repo,
            submission_repo,
        }
    }

    /// 在架任务列表，每页 9 条
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &TaskFilter, page: i64) -> Result<Paged<Task>> {
        let request = PageRequest::new(page, TASKS_PER_PAGE);
        let (items, total) = self
            .task_repo
            .list_active(filter, request.limit(), request.offset())
            .await?;

        Ok(Paged::new(items, total, request))
    }

    /// 任务详情；登录用户附带自己对该任务的提交
    #[instrument(skip(self, viewer))]
    pub async fn detail(&self, task_id: i64, viewer: Option<&Actor>) -> Result<TaskDetail> {
        let task = self
            .task_repo
            .get_active(task_id)
            .await?
            .ok_or(EcoError::TaskNotFound(task_id))?;

        let my_submission = match viewer {
            Some(actor) => {
                self.submission_repo
                    .find_for(actor.account_id, task_id)
                    .await?
            }
            None => None,
        };

        Ok(TaskDetail {
            task,
            my_submission,
        })
    }

    #[instrument(skip(self, actor, draft), fields(moderator = %actor.username))]
    pub async fn create(&self, actor: &Actor, draft: &TaskDraft) -> Result<Task> {
        actor.require_moderator()?;
        validate_draft(draft)?;

        let task = self.task_repo.create(draft).await?;
        info!(task_id = task.id, title = %task.title, "Task created");
        Ok(task)
    }

    #[instrument(skip(self, actor, draft), fields(moderator = %actor.username))]
    pub async fn update(&self, actor: &Actor, task_id: i64, draft: &TaskDraft) -> Result<Task> {
        actor.require_moderator()?;
        validate_draft(draft)?;

        let task = self
            .task_repo
            .update(task_id, draft)
            .await?
            .ok_or(EcoError::TaskNotFound(task_id))?;
        info!(task_id, "Task updated");
        Ok(task)
    }

    /// 设置示例图片（文件已落盘）
    pub async fn set_example_photo(&self, actor: &Actor, task_id: i64, photo: &str) -> Result<Task> {
        actor.require_moderator()?;

        self.task_repo
            .set_example_photo(task_id, photo)
            .await?
            .ok_or(EcoError::TaskNotFound(task_id))
    }

    /// 审核员查看任意任务（包括已停用）
    pub async fn get_any(&self, actor: &Actor, task_id: i64) -> Result<Task> {
        actor.require_moderator()?;

        self.task_repo
            .get(task_id)
            .await?
            .ok_or(EcoError::TaskNotFound(task_id))
    }
}

fn validate_draft(draft: &TaskDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(EcoError::Validation("任务标题不能为空".to_string()));
    }
    if draft.reward < 0 {
        return Err(EcoError::Validation("任务奖励不能为负数".to_string()));
    }
    Ok(())
}
