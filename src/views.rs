use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use utoipa::ToSchema;

/// View
///
/// Identifies a page component the route table can mount. The components
/// themselves live in the UI layer; the portal only decides which one to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum View {
    Login,
    Register,
    StudentDashboard,
    StudentCourses,
    StudentAttendance,
    StudentProfile,
    TeacherDashboard,
    TeacherCourses,
    TeacherAttendance,
    TeacherProfile,
    AdminDashboard,
    AdminUsers,
    AdminCourses,
    AdminAttendance,
}

impl View {
    /// Module path of the component that renders this view.
    pub fn component(&self) -> &'static str {
        match self {
            View::Login => "views/Login",
            View::Register => "views/Register",
            View::StudentDashboard => "views/student/Dashboard",
            View::StudentCourses => "views/student/Courses",
            View::StudentAttendance => "views/student/Attendance",
            View::StudentProfile => "views/student/Profile",
            View::TeacherDashboard => "views/teacher/Dashboard",
            View::TeacherCourses => "views/teacher/Courses",
            View::TeacherAttendance => "views/teacher/Attendance",
            View::TeacherProfile => "views/teacher/Profile",
            View::AdminDashboard => "views/admin/Dashboard",
            View::AdminUsers => "views/admin/Users",
            View::AdminCourses => "views/admin/Courses",
            View::AdminAttendance => "views/admin/Attendance",
        }
    }
}

/// A view component after its first load.
#[derive(Debug)]
pub struct LoadedView {
    pub view: View,
    pub component: &'static str,
    pub loaded_at: DateTime<Utc>,
}

/// ViewLoader
///
/// Lazily instantiates a view the first time its route is mounted and hands out
/// the same instance afterwards.
#[derive(Debug)]
pub struct ViewLoader {
    view: View,
    loaded: OnceLock<Arc<LoadedView>>,
}

impl ViewLoader {
    pub fn new(view: View) -> Self {
        Self {
            view,
            loaded: OnceLock::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn load(&self) -> Arc<LoadedView> {
        self.loaded
            .get_or_init(|| {
                tracing::debug!(component = self.view.component(), "loading view component");
                Arc::new(LoadedView {
                    view: self.view,
                    component: self.view.component(),
                    loaded_at: Utc::now(),
                })
            })
            .clone()
    }
}
