use super::ApiClient;
use crate::{
    error::ApiError,
    models::{DashboardStats, PageQuery, StudentPage, TeacherPage},
};

impl ApiClient {
    pub async fn admin_dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.get("/admin/dashboard").await
    }

    /// One page of student accounts; `search` matches number, name, username or major.
    pub async fn admin_students(&self, query: &PageQuery) -> Result<StudentPage, ApiError> {
        self.get_with_query("/admin/students", query).await
    }

    /// One page of teacher accounts; `search` matches number, name, username or department.
    pub async fn admin_teachers(&self, query: &PageQuery) -> Result<TeacherPage, ApiError> {
        self.get_with_query("/admin/teachers", query).await
    }
}
