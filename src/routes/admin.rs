use super::{RouteDescriptor, guard::role_guard};
use crate::{models::Role, views::View};

/// Admin Routes
///
/// Oversight pages. Admins have no profile page; instead they manage users.
pub fn admin_routes() -> RouteDescriptor {
    RouteDescriptor::redirect(Role::Admin.prefix(), Role::Admin.home_path())
        .guarded(role_guard(Role::Admin))
        .with_children(vec![
            // System-wide counters (students, teachers, courses, attendances).
            RouteDescriptor::view("dashboard", "AdminDashboard", View::AdminDashboard),
            // Student and teacher accounts.
            RouteDescriptor::view("users", "AdminUsers", View::AdminUsers),
            RouteDescriptor::view("courses", "AdminCourses", View::AdminCourses),
            RouteDescriptor::view("attendance", "AdminAttendance", View::AdminAttendance),
        ])
}
