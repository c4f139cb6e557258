use super::ApiClient;
use crate::{
    error::ApiError,
    models::{AttendanceFilter, AttendanceRecord, AttendanceStats, Course},
};

impl ApiClient {
    /// Courses the logged-in student is enrolled in.
    pub async fn student_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get("/student/courses").await
    }

    /// The student's own attendance, newest first, optionally narrowed by
    /// course and date range.
    pub async fn student_attendances(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.get_with_query("/student/attendances", filter).await
    }

    pub async fn student_attendance_stats(
        &self,
        course_id: Option<i64>,
    ) -> Result<AttendanceStats, ApiError> {
        match course_id {
            Some(id) => {
                self.get_with_query("/student/attendance_stats", &[("course_id", id)])
                    .await
            }
            None => self.get("/student/attendance_stats").await,
        }
    }
}
