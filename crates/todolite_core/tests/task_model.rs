use todolite_core::{Task, TaskValidationError};

#[test]
fn new_task_starts_open_at_given_position() {
    let task = Task::new(1_700_000_000_000, "buy milk", 3);
    assert_eq!(task.id, 1_700_000_000_000);
    assert_eq!(task.text, "buy milk");
    assert!(!task.done);
    assert_eq!(task.sort_order, Some(3));
}

#[test]
fn validate_rejects_blank_text() {
    let mut task = Task::new(1, "ok", 0);
    assert!(task.validate().is_ok());

    task.text = "   ".to_string();
    assert_eq!(task.validate(), Err(TaskValidationError::EmptyText));

    task.text = String::new();
    assert_eq!(task.validate(), Err(TaskValidationError::EmptyText));
}

#[test]
fn toggle_flips_and_double_toggle_restores() {
    let mut task = Task::new(1, "walk dog", 0);
    task.toggle();
    assert!(task.done);
    task.toggle();
    assert!(!task.done);
}

#[test]
fn missing_sort_order_sorts_after_every_present_value() {
    let ordered = Task::new(1, "first", 9_999);
    let mut unordered = Task::new(2, "legacy", 0);
    unordered.sort_order = None;

    assert!(ordered.order_key() < unordered.order_key());
}

#[test]
fn serialized_record_uses_external_schema_naming() {
    let task = Task::new(42, "write tests", 7);
    let value = serde_json::to_value(&task).unwrap();

    assert_eq!(value["id"], 42);
    assert_eq!(value["text"], "write tests");
    assert_eq!(value["done"], false);
    // The display position is persisted under the external name `order`.
    assert_eq!(value["order"], 7);
    assert!(value.get("sort_order").is_none());
}

#[test]
fn deserializes_record_with_missing_order() {
    let task: Task =
        serde_json::from_str(r#"{"id":5,"text":"old row","done":true,"order":null}"#).unwrap();
    assert_eq!(task.id, 5);
    assert!(task.done);
    assert_eq!(task.sort_order, None);
}
