use attendance_portal::{
    error::StorageError,
    models::{Role, Session, SessionUser},
    session::{SessionStore, TOKEN_KEY, USER_KEY},
    storage::{FileStorage, LocalStorage, MemoryStorage, StorageState},
};
use std::{fs, path::PathBuf, sync::Arc};
use uuid::Uuid;

fn scratch_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("attendance-portal-{}", Uuid::new_v4().simple()))
        .join("storage.json")
}

fn teacher_session() -> Session {
    Session {
        token: Some("abc".to_string()),
        user: SessionUser::new(Role::Teacher).with_field("username", "wang"),
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("token").unwrap(), None);

        storage.set_item("token", "abc").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));

        storage.remove_item("token").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_apply_sets_and_removes_together() {
        let storage = MemoryStorage::with_entries([("token", "old"), ("theme", "dark")]);
        storage.apply(&[("user", "{}")], &["token"]).unwrap();

        assert_eq!(storage.get_item("token").unwrap(), None);
        assert_eq!(storage.get_item("user").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_remove_many_ignores_absent_keys() {
        let storage = MemoryStorage::with_entries([("token", "abc"), ("theme", "dark")]);
        storage.remove_many(&["token", "user"]).unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let storage = FileStorage::new(scratch_path());
        assert_eq!(storage.get_item("token").unwrap(), None);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let path = scratch_path();
        FileStorage::new(&path)
            .set_many(&[("token", "abc"), ("user", r#"{"role":"student"}"#)])
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(
            reopened.get_item("user").unwrap().as_deref(),
            Some(r#"{"role":"student"}"#)
        );

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_reported_then_replaced() {
        let path = scratch_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json at all").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get_item("token"),
            Err(StorageError::Corrupt(_))
        ));

        storage.remove_many(&["token", "user"]).unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let path = scratch_path();
        let storage = FileStorage::new(&path);
        storage.set_item("token", "abc").unwrap();
        storage.remove_item("token").unwrap();

        let dir = path.parent().unwrap();
        let names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("storage.json")]);

        let _ = fs::remove_dir_all(dir);
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn test_establish_writes_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone() as StorageState);

        store.establish(&teacher_session()).unwrap();

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        let reader = store.reader();
        assert_eq!(reader.role(), Some(Role::Teacher));
        assert_eq!(reader.session(), Some(teacher_session()));
    }

    #[test]
    fn test_establish_without_token_drops_stale_token() {
        let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "stale")]));
        let store = SessionStore::new(storage.clone() as StorageState);
        let session = Session {
            token: None,
            user: SessionUser::new(Role::Student).with_field("id", 3),
        };

        store.establish(&session).unwrap();

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        let reader = store.reader();
        assert_eq!(reader.token(), None);
        assert_eq!(reader.role(), Some(Role::Student));
        assert_eq!(reader.session(), Some(session));
    }

    #[test]
    fn test_clear_removes_both_keys_only() {
        let storage = Arc::new(MemoryStorage::with_entries([("theme", "dark")]));
        let store = SessionStore::new(storage.clone() as StorageState);
        store.establish(&teacher_session()).unwrap();

        store.clear().unwrap();

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(USER_KEY).unwrap(), None);
        assert_eq!(storage.len(), 1);
        assert!(store.reader().session().is_none());
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let storage = Arc::new(MemoryStorage::with_entries([
            (TOKEN_KEY, "abc"),
            (USER_KEY, "{not json"),
        ]));
        let reader = SessionStore::new(storage as StorageState).reader();

        assert_eq!(reader.user(), None);
        assert_eq!(reader.session(), None);
        // The token is still readable on its own; only the profile is unusable.
        assert_eq!(reader.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_unexpected_profile_types_keep_the_user() {
        let storage = Arc::new(MemoryStorage::with_entries([(
            USER_KEY,
            r#"{"role":"teacher","id":"T-1","username":42}"#,
        )]));
        let reader = SessionStore::new(storage as StorageState).reader();

        let user = reader.user().unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.id(), None);
        assert_eq!(user.username(), None);
    }

    #[test]
    fn test_unknown_role_reads_as_absent() {
        let storage = Arc::new(MemoryStorage::with_entries([(USER_KEY, r#"{"role":"principal"}"#)]));
        let reader = SessionStore::new(storage as StorageState).reader();
        assert_eq!(reader.role(), None);
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "")]));
        let reader = SessionStore::new(storage as StorageState).reader();
        assert_eq!(reader.token(), None);
    }

    #[test]
    fn test_session_round_trips_through_file_storage() {
        let path = scratch_path();
        let store = SessionStore::new(Arc::new(FileStorage::new(&path)) as StorageState);
        store.establish(&teacher_session()).unwrap();

        let reopened = SessionStore::new(Arc::new(FileStorage::new(&path)) as StorageState);
        assert_eq!(reopened.reader().session(), Some(teacher_session()));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
