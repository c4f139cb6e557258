use super::{RouteDescriptor, guard::role_guard};
use crate::{models::Role, views::View};

/// Student Routes
///
/// `/student` forwards to the dashboard. The student role guard sits on the
/// parent, so every child below is gated by the same check.
pub fn student_routes() -> RouteDescriptor {
    RouteDescriptor::redirect(Role::Student.prefix(), Role::Student.home_path())
        .guarded(role_guard(Role::Student))
        .with_children(vec![
            RouteDescriptor::view("dashboard", "StudentDashboard", View::StudentDashboard),
            // Enrolled courses and schedule.
            RouteDescriptor::view("courses", "StudentCourses", View::StudentCourses),
            // Own check-in history and attendance rate.
            RouteDescriptor::view("attendance", "StudentAttendance", View::StudentAttendance),
            RouteDescriptor::view("profile", "StudentProfile", View::StudentProfile),
        ])
}
