//! 任务提交与审核服务
//!
//! 提交状态只能从 pending 流转一次：
//! - 通过：写入审核时间，按任务奖励入账，发送通过通知
//! - 拒绝：写入审核意见和审核时间，发送拒绝通知
//!
//! 对非 pending 的提交执行通过是空操作（不重复发放奖励）；执行拒绝则报错。

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, instrument};

use eco_shared::observability::metrics;

use crate::actor::Actor;
use crate::error::{EcoError, Result};
use crate::models::{
    NewLedgerEntry, NewNotification, NewSubmission, Submission, SubmissionStatus, SubmissionView,
    Task,
};
use crate::repository::{NotificationRepository, SubmissionRepository, TaskRepository};
use crate::service::LedgerService;
use crate::service::dto::{DEFAULT_PAGE_SIZE, PageRequest, Paged, StatusFilter};

/// 审核意见最大长度
pub const MAX_COMMENT_LEN: usize = 1000;

pub struct ReviewService {
    task_repo: Arc<TaskRepository>,
    submission_repo: Arc<SubmissionRepository>,
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            task_repo: Arc::new(TaskRepository::new(pool.clone())),
            submission_repo: Arc::new(SubmissionRepository::new(pool.clone())),
            pool,
        }
    }

    /// 提交前检查：任务在架且尚未提交过
    ///
    /// 上传图片前调用，避免为必然失败的提交落盘文件
    pub async fn ensure_can_submit(&self, actor: &Actor, task_id: i64) -> Result<Task> {
        let task = self
            .task_repo
            .get_active(task_id)
            .await?
            .ok_or(EcoError::TaskNotFound(task_id))?;

        if self
            .submission_repo
            .find_for(actor.account_id, task_id)
            .await?
            .is_some()
        {
            return Err(EcoError::DuplicateSubmission(task_id));
        }

        Ok(task)
    }

    /// 提交任务完成证明
    #[instrument(skip(self, actor, description, image), fields(account_id = %actor.account_id, task_id = %task_id))]
    pub async fn submit(
        &self,
        actor: &Actor,
        task_id: i64,
        description: &str,
        image: &str,
    ) -> Result<Submission> {
        self.task_repo
            .get_active(task_id)
            .await?
            .ok_or(EcoError::TaskNotFound(task_id))?;

        let new_submission = NewSubmission {
            account_id: actor.account_id,
            task_id,
            description: description.trim().to_string(),
            image: image.to_string(),
        };

        let mut conn = self.pool.acquire().await?;
        let submission = SubmissionRepository::create_in_tx(&mut conn, &new_submission)
            .await?
            .ok_or(EcoError::DuplicateSubmission(task_id))?;

        info!(
            submission_id = submission.id,
            account_id = actor.account_id,
            task_id,
            "Task submission created"
        );

        Ok(submission)
    }

    /// 审核通过
    #[instrument(skip(self, actor), fields(moderator = %actor.username, submission_id = %submission_id))]
    pub async fn approve(&self, actor: &Actor, submission_id: i64) -> Result<Submission> {
        actor.require_moderator()?;

        let mut tx = self.pool.begin().await?;

        let submission = SubmissionRepository::lock_in_tx(&mut tx, submission_id)
            .await?
            .ok_or(EcoError::SubmissionNotFound(submission_id))?;

        if !submission.status.can_transition_to(SubmissionStatus::Approved) {
            info!(
                submission_id,
                status = %submission.status,
                "Submission already reviewed, approve is a no-op"
            );
            return Ok(submission);
        }

        let task = TaskRepository::get_in_tx(&mut tx, submission.task_id)
            .await?
            .ok_or(EcoError::TaskNotFound(submission.task_id))?;

        let approved = SubmissionRepository::set_review_in_tx(
            &mut tx,
            submission.id,
            SubmissionStatus::Approved,
            &submission.moderator_comment,
        )
        .await?;

        let reward = reward_entry(submission.account_id, &task.title, task.reward)?;
        if let Some(entry) = &reward {
            LedgerService::post_in_tx(&mut tx, entry).await?;
        }

        NotificationRepository::create_in_tx(
            &mut tx,
            &NewNotification::task_approved(submission.account_id, task.id, &task.title, task.reward),
        )
        .await?;

        tx.commit().await?;

        metrics::record_submission_review("approved");
        if let Some(entry) = &reward {
            metrics::record_coin_movement(entry.amount);
        }
        info!(
            submission_id,
            account_id = submission.account_id,
            reward = task.reward,
            "Submission approved"
        );

        Ok(approved)
    }

    /// 审核拒绝
    #[instrument(skip(self, actor, comment), fields(moderator = %actor.username, submission_id = %submission_id))]
    pub async fn reject(
        &self,
        actor: &Actor,
        submission_id: i64,
        comment: &str,
    ) -> Result<Submission> {
        actor.require_moderator()?;

        let comment = comment.trim();
        if comment.chars().count() > MAX_COMMENT_LEN {
            return Err(EcoError::Validation(format!(
                "审核意见不能超过 {} 个字符",
                MAX_COMMENT_LEN
            )));
        }

        let mut tx = self.pool.begin().await?;

        let submission = SubmissionRepository::lock_in_tx(&mut tx, submission_id)
            .await?
            .ok_or(EcoError::SubmissionNotFound(submission_id))?;

        if !submission.status.can_transition_to(SubmissionStatus::Rejected) {
            return Err(EcoError::InvalidSubmissionTransition {
                id: submission_id,
                current: submission.status.to_string(),
            });
        }

        let task = TaskRepository::get_in_tx(&mut tx, submission.task_id)
            .await?
            .ok_or(EcoError::TaskNotFound(submission.task_id))?;

        let rejected = SubmissionRepository::set_review_in_tx(
            &mut tx,
            submission.id,
            SubmissionStatus::Rejected,
            comment,
        )
        .await?;

        NotificationRepository::create_in_tx(
            &mut tx,
            &NewNotification::task_rejected(submission.account_id, task.id, &task.title),
        )
        .await?;

        tx.commit().await?;

        metrics::record_submission_review("rejected");
        info!(
            submission_id,
            account_id = submission.account_id,
            "Submission rejected"
        );

        Ok(rejected)
    }

    /// 当前用户的提交，可按状态过滤
    pub async fn my_submissions(
        &self,
        actor: &Actor,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionView>> {
        self.submission_repo
            .list_by_account(actor.account_id, status)
            .await
    }

    /// 审核列表，默认只看待审核
    #[instrument(skip(self, actor), fields(moderator = %actor.username))]
    pub async fn review_queue(
        &self,
        actor: &Actor,
        filter: StatusFilter<SubmissionStatus>,
        page: i64,
    ) -> Result<Paged<SubmissionView>> {
        actor.require_moderator()?;

        let request = PageRequest::new(page, DEFAULT_PAGE_SIZE);
        let (items, total) = self
            .submission_repo
            .list_by_status(filter.status(), request.limit(), request.offset())
            .await?;

        Ok(Paged::new(items, total, request))
    }
}

/// 审核通过时的奖励流水，零奖励任务只改状态，不记流水
fn reward_entry(account_id: i64, task_title: &str, reward: i64) -> Result<Option<NewLedgerEntry>> {
    if reward == 0 {
        return Ok(None);
    }
    NewLedgerEntry::task_reward(account_id, task_title, reward).map(Some)
}
