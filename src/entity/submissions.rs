//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub workflow_state: String,
    pub score: Option<f64>,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(
        self,
    ) -> crate::errors::Result<crate::models::analytics::entities::Submission> {
        use crate::models::analytics::entities::{Submission, SubmissionWorkflowState};

        Ok(Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            user_id: self.user_id,
            workflow_state: self
                .workflow_state
                .parse()
                .unwrap_or(SubmissionWorkflowState::Unsubmitted),
            score: self.score,
            submitted_at: super::from_timestamp(self.submitted_at, "submissions.submitted_at")?,
            graded_at: super::from_timestamp(self.graded_at, "submissions.graded_at")?,
        })
    }
}
