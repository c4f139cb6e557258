use chrono::NaiveDate;

use super::ApiClient;
use crate::{
    error::ApiError,
    models::{AttendanceRecord, Course, CourseStudent},
};

impl ApiClient {
    pub async fn teacher_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get("/teacher/courses").await
    }

    /// Students enrolled in one of the teacher's courses. The backend answers
    /// 404 for courses the teacher does not own.
    pub async fn course_students(&self, course_id: i64) -> Result<Vec<CourseStudent>, ApiError> {
        self.get(&format!("/teacher/courses/{course_id}/students"))
            .await
    }

    /// Attendance sheet of a course, optionally for a single day.
    pub async fn course_attendances(
        &self,
        course_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let path = format!("/teacher/courses/{course_id}/attendances");
        match date {
            Some(date) => {
                let date = date.format("%Y-%m-%d").to_string();
                self.get_with_query(&path, &[("date", date)]).await
            }
            None => self.get(&path).await,
        }
    }
}
