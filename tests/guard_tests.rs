use attendance_portal::{
    error::NavigationError,
    models::Role,
    navigator::{HISTORY_LIMIT, Navigator},
    routes::{
        Location, RouteDescriptor, RouteTable,
        guard::{Decision, LOGIN_PATH, role_guard},
    },
    session::{SessionReader, TOKEN_KEY, USER_KEY},
    storage::{MemoryStorage, StorageState},
    views::View,
};
use std::sync::Arc;

// --- Helpers ---

fn reader_with(entries: &[(&str, &str)]) -> SessionReader {
    let storage = Arc::new(MemoryStorage::with_entries(entries.iter().copied())) as StorageState;
    SessionReader::detached(storage)
}

fn logged_in_as(role: Role) -> SessionReader {
    let user = format!(r#"{{"id":1,"username":"u","role":"{role}"}}"#);
    reader_with(&[(TOKEN_KEY, "abc"), (USER_KEY, user.as_str())])
}

/// Every guarded path of the portal, paired with the role that owns it.
const GUARDED: [(&str, Role); 12] = [
    ("/student/dashboard", Role::Student),
    ("/student/courses", Role::Student),
    ("/student/attendance", Role::Student),
    ("/student/profile", Role::Student),
    ("/teacher/dashboard", Role::Teacher),
    ("/teacher/courses", Role::Teacher),
    ("/teacher/attendance", Role::Teacher),
    ("/teacher/profile", Role::Teacher),
    ("/admin/dashboard", Role::Admin),
    ("/admin/users", Role::Admin),
    ("/admin/courses", Role::Admin),
    ("/admin/attendance", Role::Admin),
];

// --- Role Guard ---

#[test]
fn test_role_guard_denies_every_other_role() {
    let to = Location::parse("/teacher/dashboard");
    for required in Role::ALL {
        let guard = role_guard(required);
        for actual in Role::ALL {
            let decision = guard(&to, None, &logged_in_as(actual));
            if actual == required {
                assert_eq!(decision, Decision::Proceed);
            } else {
                assert_eq!(decision, Decision::Redirect(LOGIN_PATH.to_string()));
            }
        }
    }
}

#[test]
fn test_role_guard_denies_missing_and_malformed_sessions() {
    let to = Location::parse("/student/dashboard");
    let guard = role_guard(Role::Student);

    let cases = [
        reader_with(&[]),
        reader_with(&[(TOKEN_KEY, "abc")]),
        reader_with(&[(USER_KEY, "{broken")]),
        reader_with(&[(USER_KEY, "null")]),
        reader_with(&[(USER_KEY, r#"{"name":"no role"}"#)]),
        reader_with(&[(USER_KEY, r#"{"role":"Student"}"#)]),
    ];
    for session in &cases {
        assert_eq!(guard(&to, None, session), Decision::to_login());
    }
}

// --- Route Table ---

#[test]
fn test_no_session_redirects_every_guarded_path() {
    let table = RouteTable::portal();
    let session = reader_with(&[]);

    for (path, _) in GUARDED {
        let navigation = table.resolve(path, None, &session).unwrap();
        assert_eq!(navigation.location.path, LOGIN_PATH, "path {path}");
        assert_eq!(navigation.view, View::Login);
        assert!(navigation.redirected);
    }
}

#[test]
fn test_mismatched_role_redirects_and_owner_mounts() {
    let table = RouteTable::portal();

    for (path, owner) in GUARDED {
        for role in Role::ALL {
            let navigation = table.resolve(path, None, &logged_in_as(role)).unwrap();
            if role == owner {
                assert_eq!(navigation.location.path, path);
                assert!(!navigation.redirected);
            } else {
                assert_eq!(navigation.location.path, LOGIN_PATH, "{role} at {path}");
            }
        }
    }
}

#[test]
fn test_malformed_session_is_treated_as_absent() {
    let table = RouteTable::portal();
    let session = reader_with(&[(TOKEN_KEY, "abc"), (USER_KEY, "<<not json>>")]);

    let navigation = table.resolve("/admin/users", None, &session).unwrap();
    assert_eq!(navigation.view, View::Login);
}

#[test]
fn test_role_alone_decides_entry() {
    let table = RouteTable::portal();
    let session = reader_with(&[(TOKEN_KEY, "abc"), (USER_KEY, r#"{"role":"teacher","id":"T-1"}"#)]);

    let navigation = table.resolve("/teacher/attendance", None, &session).unwrap();
    assert_eq!(navigation.location.path, "/teacher/attendance");
    assert_eq!(navigation.view, View::TeacherAttendance);
    assert!(!navigation.redirected);

    // Same profile, wrong subtree.
    let denied = table.resolve("/student/courses", None, &session).unwrap();
    assert_eq!(denied.view, View::Login);
}

#[test]
fn test_teacher_scenario() {
    let table = RouteTable::portal();
    let session = reader_with(&[(TOKEN_KEY, "abc"), (USER_KEY, r#"{"role":"teacher"}"#)]);

    let denied = table.resolve("/admin/dashboard", None, &session).unwrap();
    assert_eq!(denied.location.path, "/login");
    assert_eq!(denied.requested, "/admin/dashboard");
    assert!(denied.redirected);

    let allowed = table.resolve("/teacher/attendance", None, &session).unwrap();
    assert_eq!(allowed.location.path, "/teacher/attendance");
    assert_eq!(allowed.view, View::TeacherAttendance);
    assert_eq!(allowed.route_name, Some("TeacherAttendance"));
    assert_eq!(allowed.component, "views/teacher/Attendance");
}

#[test]
fn test_top_level_and_subtree_redirects() {
    let table = RouteTable::portal();

    let root = table.resolve("/", None, &reader_with(&[])).unwrap();
    assert_eq!(root.view, View::Login);

    let student = table.resolve("/student", None, &logged_in_as(Role::Student)).unwrap();
    assert_eq!(student.location.path, "/student/dashboard");
    assert_eq!(student.view, View::StudentDashboard);
    assert!(student.redirected);

    // The subtree redirect still passes through the guard.
    let intruder = table.resolve("/student/", None, &logged_in_as(Role::Admin)).unwrap();
    assert_eq!(intruder.view, View::Login);
}

#[test]
fn test_public_pages_need_no_session() {
    let table = RouteTable::portal();
    let session = reader_with(&[]);

    let register = table.resolve("/register?ref=mail", None, &session).unwrap();
    assert_eq!(register.view, View::Register);
    assert_eq!(register.location.query.as_deref(), Some("ref=mail"));
    assert!(!register.redirected);
}

#[test]
fn test_unknown_paths_are_not_found() {
    let table = RouteTable::portal();
    let session = logged_in_as(Role::Admin);

    assert_eq!(
        table.resolve("/admin/profile", None, &session).unwrap_err(),
        NavigationError::NotFound("/admin/profile".to_string())
    );
    assert!(matches!(
        table.resolve("/nowhere", None, &session),
        Err(NavigationError::NotFound(_))
    ));
}

#[test]
fn test_redirect_cycle_is_detected() {
    let table = RouteTable::new(vec![
        RouteDescriptor::redirect("/a", "/b"),
        RouteDescriptor::redirect("/b", "/a"),
    ]);

    assert_eq!(
        table.resolve("/a", None, &reader_with(&[])).unwrap_err(),
        NavigationError::RedirectLoop("/a".to_string())
    );
}

#[test]
fn test_views_load_lazily_once() {
    let table = RouteTable::portal();
    let admin = table
        .routes()
        .iter()
        .find(|route| route.path == "/admin")
        .unwrap();
    let users = admin
        .children
        .iter()
        .find(|child| child.path == "users")
        .and_then(|child| child.view.as_ref())
        .unwrap();

    assert!(!users.is_loaded());

    // A denied navigation never loads the view.
    table.resolve("/admin/users", None, &reader_with(&[])).unwrap();
    assert!(!users.is_loaded());

    let first = table.resolve("/admin/users", None, &logged_in_as(Role::Admin)).unwrap();
    assert!(users.is_loaded());
    let loaded = users.load();
    assert_eq!(loaded.view, first.view);
    assert!(Arc::ptr_eq(&loaded, &users.load()));
}

// --- Navigator ---

#[test]
fn test_navigator_tracks_current_location_and_history() {
    let storage = Arc::new(MemoryStorage::with_entries([
        (TOKEN_KEY, "abc"),
        (USER_KEY, r#"{"role":"student"}"#),
    ])) as StorageState;
    let navigator = Navigator::new(
        Arc::new(RouteTable::portal()),
        SessionReader::detached(storage),
    );

    assert!(navigator.current().is_none());

    navigator.push("/student").unwrap();
    navigator.push("/teacher/dashboard").unwrap();
    assert!(navigator.push("/missing").is_err());

    assert_eq!(navigator.current().unwrap().path, "/login");
    assert_eq!(navigator.history(), vec!["/student/dashboard", "/login"]);
}

#[test]
fn test_navigator_history_is_bounded() {
    let navigator = Navigator::new(Arc::new(RouteTable::portal()), reader_with(&[]));

    for _ in 0..HISTORY_LIMIT {
        navigator.push("/login").unwrap();
    }
    navigator.push("/register").unwrap();

    let history = navigator.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.last().map(String::as_str), Some("/register"));
    assert_eq!(navigator.last().unwrap().view, View::Register);
}
