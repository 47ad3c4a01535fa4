//! 页面访问按日汇总实体

use sea_orm::entity::prelude::*;

use crate::errors::AnalyticsError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "page_views_rollups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    // YYYY-MM-DD
    pub date: String,
    pub views: i64,
    pub participations: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_rollup(
        self,
    ) -> crate::errors::Result<crate::models::analytics::entities::PageViewsRollup> {
        use crate::models::analytics::entities::PageViewsRollup;

        let date = chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            AnalyticsError::database_operation(format!(
                "访问汇总 {} 的日期无效 '{}': {e}",
                self.id, self.date
            ))
        })?;

        Ok(PageViewsRollup {
            course_id: self.course_id,
            user_id: self.user_id,
            date,
            views: self.views,
            participations: self.participations,
        })
    }
}
