//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod page_views;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{AnalyticsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AnalyticsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 包装已完成迁移的连接（测试中使用内存 SQLite）
    #[cfg(test)]
    pub(crate) fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AnalyticsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AnalyticsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AnalyticsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AnalyticsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::analytics::entities::{
    Assignment, AssignmentOverride, Course, Enrollment, PageViewsRollup, Student, Submission,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 课程模块
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        self.list_course_enrollments_impl(course_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<Student>> {
        self.list_course_students_impl(course_id).await
    }

    // 作业模块
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        self.list_course_assignments_impl(course_id).await
    }

    async fn list_assignment_overrides(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<AssignmentOverride>> {
        self.list_assignment_overrides_impl(assignment_ids).await
    }

    // 提交模块
    async fn list_submissions(
        &self,
        assignment_ids: &[i64],
        student_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_submissions_impl(assignment_ids, student_ids)
            .await
    }

    // 页面访问模块
    async fn list_page_views_rollups(&self, course_id: i64) -> Result<Vec<PageViewsRollup>> {
        self.list_page_views_rollups_impl(course_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        assignment_overrides, assignments, courses, enrollments, page_views_rollups, submissions,
        users,
    };
    use crate::models::analytics::entities::{EnrollmentState, SubmissionType};
    use sea_orm::{ActiveModelTrait, Set};

    async fn seeded() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        courses::ActiveModel {
            id: Set(1),
            name: Set("Biology 101".to_string()),
            start_at: Set(Some(1_346_457_600)),
            conclude_at: Set(None),
            created_at: Set(0),
        }
        .insert(&db)
        .await
        .unwrap();

        for (id, name, sortable) in [
            (1, "Zed Young", "Young, Zed"),
            (2, "Amy Adams", "Adams, Amy"),
            (3, "Ivy Invited", "Invited, Ivy"),
        ] {
            users::ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                sortable_name: Set(sortable.to_string()),
                created_at: Set(0),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        for (id, user_id, state) in [
            (1, 1, EnrollmentState::ACTIVE),
            (2, 2, EnrollmentState::COMPLETED),
            (3, 3, EnrollmentState::INVITED),
            // 同一学生在另一个教学班的重复选课
            (4, 1, EnrollmentState::ACTIVE),
        ] {
            enrollments::ActiveModel {
                id: Set(id),
                course_id: Set(1),
                user_id: Set(user_id),
                course_section_id: Set(Some(100 + id)),
                workflow_state: Set(state.to_string()),
                start_at: Set(None),
                end_at: Set(None),
                created_at: Set(0),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let rows = [
            (10, "published", 2),
            (11, "published", 1),
            (12, "unpublished", 3),
        ];
        for (id, state, position) in rows {
            assignments::ActiveModel {
                id: Set(id),
                course_id: Set(1),
                title: Set(format!("Assignment {id}")),
                due_at: Set(Some(1_354_320_000)),
                submission_types: Set("online_upload, on_paper".to_string()),
                workflow_state: Set(state.to_string()),
                position: Set(position),
                created_at: Set(0),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        assignment_overrides::ActiveModel {
            id: Set(1),
            assignment_id: Set(10),
            student_id: Set(Some(2)),
            course_section_id: Set(None),
            due_at: Set(None),
            created_at: Set(0),
        }
        .insert(&db)
        .await
        .unwrap();

        submissions::ActiveModel {
            id: Set(1),
            assignment_id: Set(10),
            user_id: Set(1),
            workflow_state: Set("graded".to_string()),
            score: Set(Some(8.5)),
            submitted_at: Set(None),
            graded_at: Set(Some(1_354_406_400)),
            updated_at: Set(0),
        }
        .insert(&db)
        .await
        .unwrap();

        page_views_rollups::ActiveModel {
            id: Set(1),
            course_id: Set(1),
            user_id: Set(1),
            date: Set("2013-01-02".to_string()),
            views: Set(7),
            participations: Set(2),
        }
        .insert(&db)
        .await
        .unwrap();

        SeaOrmStorage::from_connection(db)
    }

    #[tokio::test]
    async fn test_roster_queries() {
        let storage = seeded().await;

        let course = storage.get_course_by_id(1).await.unwrap().unwrap();
        assert_eq!(course.name, "Biology 101");
        assert!(storage.get_course_by_id(2).await.unwrap().is_none());

        let enrollments = storage.list_course_enrollments(1).await.unwrap();
        assert_eq!(enrollments.len(), 3);

        let students = storage.list_course_students(1).await.unwrap();
        let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_assignment_queries() {
        let storage = seeded().await;

        let assignments = storage.list_course_assignments(1).await.unwrap();
        let ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![11, 10]);
        assert_eq!(
            assignments[0].submission_types,
            vec![SubmissionType::OnlineUpload, SubmissionType::OnPaper]
        );

        let overrides = storage.list_assignment_overrides(&[10, 11]).await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].due_at, None);
        assert!(storage.list_assignment_overrides(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_due_at_is_error() {
        let storage = seeded().await;
        assignments::ActiveModel {
            id: Set(13),
            course_id: Set(1),
            title: Set("Broken".to_string()),
            due_at: Set(Some(i64::MAX)),
            submission_types: Set("online_upload".to_string()),
            workflow_state: Set("published".to_string()),
            position: Set(4),
            created_at: Set(0),
        }
        .insert(&storage.db)
        .await
        .unwrap();

        let err = storage.list_course_assignments(1).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::DatabaseOperation(_)));
    }

    #[tokio::test]
    async fn test_submission_and_rollup_queries() {
        let storage = seeded().await;

        let submissions = storage.list_submissions(&[10, 11], &[1, 2]).await.unwrap();
        assert_eq!(submissions.len(), 1);
        assert!(submissions[0].is_graded());
        assert!(storage.list_submissions(&[10], &[]).await.unwrap().is_empty());

        let rollups = storage.list_page_views_rollups(1).await.unwrap();
        assert_eq!(rollups.len(), 1);
        assert_eq!(rollups[0].date.to_string(), "2013-01-02");
    }
}
