use super::{RouteDescriptor, guard::role_guard};
use crate::{models::Role, views::View};

/// Teacher Routes
///
/// Mirrors the student subtree, gated by the teacher role guard.
pub fn teacher_routes() -> RouteDescriptor {
    RouteDescriptor::redirect(Role::Teacher.prefix(), Role::Teacher.home_path())
        .guarded(role_guard(Role::Teacher))
        .with_children(vec![
            RouteDescriptor::view("dashboard", "TeacherDashboard", View::TeacherDashboard),
            // Courses taught, with their enrolled students.
            RouteDescriptor::view("courses", "TeacherCourses", View::TeacherCourses),
            // Per-course attendance sheets.
            RouteDescriptor::view("attendance", "TeacherAttendance", View::TeacherAttendance),
            RouteDescriptor::view("profile", "TeacherProfile", View::TeacherProfile),
        ])
}
