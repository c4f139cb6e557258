use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;

// --- Identity ---

/// Role
///
/// The closed set of portal roles. Serialized lowercase, which is the form the
/// backend sends and the form cached in local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Teacher, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Prefix of the route subtree owned by this role.
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Teacher => "/teacher",
            Role::Admin => "/admin",
        }
    }

    /// Landing page after login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Student => "/student/dashboard",
            Role::Teacher => "/teacher/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SessionUser
///
/// The profile cached under the `user` storage key. Only `role` is typed;
/// every other field the backend sends is kept verbatim in `profile`, so an
/// unexpected profile shape never locks a user out of their pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub role: Role,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl SessionUser {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            profile: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.profile.insert(key.to_string(), value.into());
        self
    }

    /// Numeric account id, if the backend sent one as a number.
    pub fn id(&self) -> Option<i64> {
        self.profile.get("id").and_then(Value::as_i64)
    }

    pub fn username(&self) -> Option<&str> {
        self.profile.get("username").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.profile.get("email").and_then(Value::as_str)
    }
}

/// Session
///
/// Cached proof of authentication: the profile used for client-side route
/// checks plus the bearer token, when the backend hands one out. Backends that
/// authenticate by cookie leave `token` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: SessionUser,
}

// --- Auth Payloads ---

/// LoginRequest
///
/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub user_type: Role,
}

/// LoginResponse
///
/// Successful login payload. `token`, when present, is what the request
/// interceptor attaches afterwards; cookie-based backends omit it.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub username: Option<String>,
    pub user: SessionUser,
    #[serde(default)]
    pub token: Option<String>,
}

/// RegisterRequest
///
/// Body of `POST /auth/register`. Only students may self-register; the backend
/// answers 403 for the other user types.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub user_type: Role,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Generic `{"message": ...}` envelope the backend uses for acknowledgements and errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

// --- Courses & Attendance ---

/// Course
///
/// A course as listed for a student (with the teacher's name) or for a teacher
/// (with description and category). Fields that only one view carries are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub course_code: String,
    pub name: String,
    pub description: Option<String>,
    pub teacher: Option<String>,
    pub teacher_id: Option<i64>,
    pub credits: Option<f64>,
    pub semester: Option<String>,
    pub year: Option<i32>,
    // "HH:MM"
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub day_of_week: Option<i32>,
    pub location: Option<String>,
    pub category_name: Option<String>,
}

/// AttendanceStatus
///
/// Anything the backend adds later lands in `Other` instead of failing the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Leave,
    #[serde(other)]
    Other,
}

/// AttendanceRecord
///
/// One check-in row. Student listings carry the course fields, teacher listings
/// carry the student fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub course_id: Option<i64>,
    pub course_name: Option<String>,
    pub student_id: Option<i64>,
    pub student_no: Option<String>,
    pub student_name: Option<String>,
    pub attendance_date: NaiveDate,
    // "YYYY-MM-DD HH:MM:SS", kept verbatim.
    pub check_in_time: Option<String>,
    pub status: AttendanceStatus,
    pub face_match_score: Option<f64>,
    pub remarks: Option<String>,
}

/// Query parameters of `GET /student/attendances`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttendanceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// AttendanceStats
///
/// Per-student summary; `attendance_rate` is a percentage rounded to two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total_classes: u32,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub attendance_rate: f64,
}

/// A student enrolled in one of the teacher's courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStudent {
    pub student_id: i64,
    pub student_no: String,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub major: Option<String>,
    pub class_name: Option<String>,
    #[serde(default)]
    pub has_face_data: bool,
}

// --- Administration ---

/// DashboardStats
///
/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_teachers: u64,
    pub total_courses: u64,
    pub total_attendances: u64,
    pub today_attendances: u64,
    pub month_attendances: u64,
}

/// Paging and search parameters shared by the admin listings.
#[derive(Debug, Clone, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            search: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    pub student_id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub major: Option<String>,
    pub class_name: Option<String>,
    #[serde(default)]
    pub has_face_data: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSummary {
    pub id: i64,
    pub teacher_id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPage {
    pub students: Vec<StudentSummary>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherPage {
    pub teachers: Vec<TeacherSummary>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}
