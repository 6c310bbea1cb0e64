use todolite_core::db::open_db_in_memory;
use todolite_core::{
    RepoError, SqliteTaskRepository, Task, TaskRepository, TaskService, TaskValidationError,
};
use std::collections::HashSet;

#[test]
fn added_tasks_are_all_listed_with_unique_ids_and_open_state() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.add_task("first", 1_000).unwrap();
    service.add_task("second", 2_000).unwrap();
    service.add_task("third", 3_000).unwrap();

    let tasks = service.ordered_tasks().unwrap();
    assert_eq!(tasks.len(), 3);

    let ids: HashSet<i64> = tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(tasks.iter().all(|task| !task.done));
}

#[test]
fn add_assigns_position_from_current_count() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let first = service.add_task("a", 1).unwrap();
    let second = service.add_task("b", 2).unwrap();
    let third = service.add_task("c", 3).unwrap();

    assert_eq!(first.sort_order, Some(0));
    assert_eq!(second.sort_order, Some(1));
    assert_eq!(third.sort_order, Some(2));
}

#[test]
fn add_trims_text_before_persisting() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = service.add_task("  buy milk  ", 1).unwrap();
    assert_eq!(task.text, "buy milk");

    let repo = SqliteTaskRepository::new(&conn);
    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.text, "buy milk");
}

#[test]
fn add_with_blank_text_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.add_task("keep me", 1).unwrap();

    for input in ["", "   ", "\t\n"] {
        let err = service.add_task(input, 99).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(TaskValidationError::EmptyText)
        ));
    }

    assert_eq!(service.task_count().unwrap(), 1);
}

#[test]
fn insert_rejects_duplicate_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    repo.insert_task(&Task::new(7, "one", 0)).unwrap();
    let err = repo.insert_task(&Task::new(7, "two", 1)).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn toggle_twice_restores_original_state() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = service.add_task("flip me", 1).unwrap();

    let toggled = service.toggle_task(&task).unwrap();
    assert!(toggled.done);

    let restored = service.toggle_task(&toggled).unwrap();
    assert!(!restored.done);

    let repo = SqliteTaskRepository::new(&conn);
    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert!(!stored.done);
}

#[test]
fn toggle_overwrites_the_full_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = Task::new(1, "full record", 4);
    repo.insert_task(&task).unwrap();

    let toggled = service.toggle_task(&task).unwrap();
    let stored = repo.get_task(1).unwrap().unwrap();
    assert_eq!(stored, toggled);
    // Position survives the overwrite untouched.
    assert_eq!(stored.sort_order, Some(4));
}

#[test]
fn deleted_task_never_appears_in_list() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let victim = service.add_task("remove me", 1).unwrap();
    let keeper = service.add_task("keep me", 2).unwrap();

    service.delete_task(victim.id).unwrap();

    let tasks = service.ordered_tasks().unwrap();
    assert!(tasks.iter().all(|task| task.id != victim.id));
    assert!(tasks.iter().any(|task| task.id == keeper.id));
}

#[test]
fn deleting_missing_id_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.add_task("survivor", 1).unwrap();
    service.delete_task(424_242).unwrap();

    let tasks = service.ordered_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "survivor");
}

#[test]
fn update_text_keeps_identity_and_completion() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = service.add_task("Buy milk", 1).unwrap();
    let done_task = service.toggle_task(&task).unwrap();

    let updated = service
        .update_task_text(&done_task, "Buy oat milk")
        .unwrap();
    assert_eq!(updated.id, task.id);

    let repo = SqliteTaskRepository::new(&conn);
    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.text, "Buy oat milk");
    assert!(stored.done);
}

#[test]
fn repo_rejects_invalid_persisted_done_value() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (id, text, done, sort_order) VALUES (1, 'bad', 7, 0);",
        [],
    )
    .unwrap();

    let repo = SqliteTaskRepository::new(&conn);
    let err = repo.get_task(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
