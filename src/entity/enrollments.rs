//! 选课实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub course_section_id: Option<i64>,
    pub workflow_state: String,
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(
        self,
    ) -> crate::errors::Result<crate::models::analytics::entities::Enrollment> {
        use crate::models::analytics::entities::{Enrollment, EnrollmentState};

        Ok(Enrollment {
            id: self.id,
            course_id: self.course_id,
            user_id: self.user_id,
            course_section_id: self.course_section_id,
            // 未知状态按停用处理，不计入花名册
            workflow_state: self
                .workflow_state
                .parse()
                .unwrap_or(EnrollmentState::Inactive),
            start_at: super::from_timestamp(self.start_at, "enrollments.start_at")?,
            end_at: super::from_timestamp(self.end_at, "enrollments.end_at")?,
        })
    }
}
