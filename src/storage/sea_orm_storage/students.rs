use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, TalkLearnError};
use crate::models::families::{entities::Student, requests::AddStudentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 向家庭添加学生
    pub async fn add_student_impl(
        &self,
        family_id: i64,
        req: AddStudentRequest,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            family_id: Set(family_id),
            display_name: Set(req.display_name),
            enrolled_at: Set(req.enrolled_at.map(|dt| dt.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("添加学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 列出家庭的全部学生
    pub async fn list_students_by_family_impl(&self, family_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::FamilyId.eq(family_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 从家庭移除学生（student_id 必须属于该家庭）
    pub async fn remove_student_impl(&self, family_id: i64, student_id: i64) -> Result<bool> {
        let result = Students::delete_many()
            .filter(Column::Id.eq(student_id))
            .filter(Column::FamilyId.eq(family_id))
            .exec(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("移除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
