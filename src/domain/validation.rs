//! Input validation and normalization for todo operations.
//!
//! Everything here is pure: functions take borrowed input and either return a
//! typed value or a [`TodoError::InvalidInput`] / [`TodoError::DuplicateId`].

use std::collections::{BTreeMap, HashSet};

use super::errors::{TodoError, TodoResult};
use super::models::{Todo, TodoDraft, TodoPriority, TodoStats, TodoStatus};

/// Longest accepted session id, in characters.
pub const MAX_SESSION_ID_LEN: usize = 100;

/// Validate a session id.
///
/// Ids must be non-empty, at most [`MAX_SESSION_ID_LEN`] characters, and use
/// only ASCII alphanumerics, `.`, `-` and `_`.
pub fn validate_session_id(session_id: &str) -> TodoResult<()> {
    if session_id.is_empty() {
        return Err(TodoError::invalid("Session ID is required but was empty"));
    }

    if session_id.chars().count() > MAX_SESSION_ID_LEN {
        return Err(TodoError::invalid(format!(
            "Session ID too long (maximum {MAX_SESSION_ID_LEN} characters)"
        )));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');
    if !session_id.chars().all(allowed) {
        return Err(TodoError::invalid(
            "Session ID can only contain alphanumeric characters, dots, hyphens, and underscores",
        ));
    }

    Ok(())
}

fn allowed_statuses() -> String {
    TodoStatus::ALL
        .iter()
        .map(TodoStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn allowed_priorities() -> String {
    TodoPriority::ALL
        .iter()
        .map(TodoPriority::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a status string, rejecting anything outside the enumerated set.
pub fn parse_status(value: &str) -> TodoResult<TodoStatus> {
    TodoStatus::from_str(value).ok_or_else(|| {
        TodoError::invalid(format!(
            "Invalid status '{value}'. Must be one of: {}",
            allowed_statuses()
        ))
    })
}

/// Parse a priority string, rejecting anything outside the enumerated set.
pub fn parse_priority(value: &str) -> TodoResult<TodoPriority> {
    TodoPriority::from_str(value).ok_or_else(|| {
        TodoError::invalid(format!(
            "Invalid priority '{value}'. Must be one of: {}",
            allowed_priorities()
        ))
    })
}

/// Validate a single draft and convert it into a [`Todo`].
///
/// All four fields are required at this point; run
/// [`normalize_todos_list`] first to fill in defaults.
pub fn validate_todo_item(draft: &TodoDraft) -> TodoResult<Todo> {
    let content = match draft.content.as_deref() {
        Some(c) if !c.trim().is_empty() => c,
        Some(_) => return Err(TodoError::invalid("Todo content must be a non-empty string")),
        None => return Err(TodoError::invalid("Todo item missing required field: content")),
    };

    let status = draft
        .status
        .as_deref()
        .ok_or_else(|| TodoError::invalid("Todo item missing required field: status"))?;
    let status = TodoStatus::from_str(status).ok_or_else(|| {
        TodoError::invalid(format!("Todo status must be one of: {}", allowed_statuses()))
    })?;

    let priority = draft
        .priority
        .as_deref()
        .ok_or_else(|| TodoError::invalid("Todo item missing required field: priority"))?;
    let priority = TodoPriority::from_str(priority).ok_or_else(|| {
        TodoError::invalid(format!(
            "Todo priority must be one of: {}",
            allowed_priorities()
        ))
    })?;

    let id = draft
        .id
        .as_deref()
        .ok_or_else(|| TodoError::invalid("Todo item missing required field: id"))?
        .trim();
    if id.is_empty() {
        return Err(TodoError::invalid("Todo id must not be empty"));
    }

    Ok(Todo {
        id: id.to_string(),
        content: content.to_string(),
        status,
        priority,
    })
}

/// Validate every draft and reject lists that reuse an id.
pub fn validate_todos_list(drafts: &[TodoDraft]) -> TodoResult<Vec<Todo>> {
    let mut todos = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        let todo = validate_todo_item(draft).map_err(|e| match e {
            TodoError::InvalidInput(msg) => {
                TodoError::InvalidInput(format!("Todo item {index}: {msg}"))
            }
            other => other,
        })?;
        todos.push(todo);
    }

    let mut seen = HashSet::with_capacity(todos.len());
    for todo in &todos {
        if !seen.insert(todo.id.as_str()) {
            return Err(TodoError::DuplicateId(todo.id.clone()));
        }
    }

    Ok(todos)
}

/// Fill in missing fields without touching invalid ones.
///
/// Missing or blank ids become `todo-N` where N is the 1-based position in
/// `drafts`; present ids are trimmed. Missing priority becomes `medium` and
/// missing status becomes `pending`. Collisions between generated and
/// caller-supplied ids are left for [`validate_todos_list`] to report.
pub fn normalize_todos_list(drafts: &[TodoDraft]) -> Vec<TodoDraft> {
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            let mut normalized = draft.clone();
            normalized.id = match draft.id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => Some(id.to_string()),
                _ => Some(format!("todo-{}", index + 1)),
            };
            if normalized.priority.is_none() {
                normalized.priority = Some(TodoPriority::Medium.as_str().to_string());
            }
            if normalized.status.is_none() {
                normalized.status = Some(TodoStatus::Pending.as_str().to_string());
            }
            normalized
        })
        .collect()
}

/// Next free `todo-N` id for a list, starting at `len + 1`.
pub fn next_todo_id(existing: &[Todo]) -> String {
    let taken: HashSet<&str> = existing.iter().map(|t| t.id.as_str()).collect();
    let mut counter = existing.len() + 1;
    loop {
        let candidate = format!("todo-{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Keep todos matching both filters (a `None` filter matches everything).
pub fn filter_todos(
    todos: &[Todo],
    status: Option<TodoStatus>,
    priority: Option<TodoPriority>,
) -> Vec<Todo> {
    todos
        .iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| priority.is_none_or(|p| t.priority == p))
        .cloned()
        .collect()
}

/// Fraction of completed todos; 0 for an empty list.
#[allow(clippy::cast_precision_loss)]
pub fn completion_rate(todos: &[Todo]) -> f64 {
    if todos.is_empty() {
        return 0.0;
    }
    let completed = todos
        .iter()
        .filter(|t| t.status == TodoStatus::Completed)
        .count();
    completed as f64 / todos.len() as f64
}

/// Count todos by status and by priority.
pub fn get_todo_stats(todos: &[Todo]) -> TodoStats {
    let mut status_counts = BTreeMap::new();
    let mut priority_counts = BTreeMap::new();
    for todo in todos {
        *status_counts.entry(todo.status).or_insert(0) += 1;
        *priority_counts.entry(todo.priority).or_insert(0) += 1;
    }

    TodoStats {
        total: todos.len(),
        status_counts,
        priority_counts,
        completion_rate: completion_rate(todos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn full(id: &str, content: &str) -> TodoDraft {
        TodoDraft::new(content)
            .with_id(id)
            .with_status("pending")
            .with_priority("high")
    }

    #[test]
    fn test_session_id_rules() {
        assert!(validate_session_id("s1").is_ok());
        assert!(validate_session_id("project_alpha.v2-final").is_ok());
        assert!(validate_session_id(&"a".repeat(MAX_SESSION_ID_LEN)).is_ok());

        for bad in ["", "../etc", "has space", "slash/id", "emoji🙂"] {
            let err = validate_session_id(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "accepted {bad:?}");
        }
        assert!(validate_session_id(&"a".repeat(MAX_SESSION_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_item_converts_to_todo() {
        let todo = validate_todo_item(&full(" t1 ", "Write docs")).unwrap();
        assert_eq!(todo.id, "t1");
        assert_eq!(todo.status, TodoStatus::Pending);
        assert_eq!(todo.priority, TodoPriority::High);
    }

    #[test]
    fn test_validate_item_rejects_bad_fields() {
        let blank_content = full("a", "   ");
        let bad_status = full("a", "x").with_status("done");
        let bad_priority = full("a", "x").with_priority("urgent");
        let blank_id = full("  ", "x");
        let mut missing_status = full("a", "x");
        missing_status.status = None;

        for draft in [blank_content, bad_status, bad_priority, blank_id, missing_status] {
            let err = validate_todo_item(&draft).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_validate_list_reports_index() {
        let drafts = vec![full("a", "ok"), full("b", "")];
        let err = validate_todos_list(&drafts).unwrap_err();
        assert!(err.to_string().contains("Todo item 1"), "{err}");
    }

    #[test]
    fn test_validate_list_rejects_duplicates() {
        let drafts = vec![full("a", "one"), full("a", "two")];
        let err = validate_todos_list(&drafts).unwrap_err();
        assert!(matches!(err, TodoError::DuplicateId(ref id) if id == "a"));
    }

    #[test]
    fn test_normalize_fills_defaults_without_mutating_input() {
        let drafts = vec![
            TodoDraft::new("A"),
            TodoDraft::new("B").with_id("custom").with_status("completed"),
            TodoDraft::new("C").with_id("   "),
        ];
        let before = drafts.clone();
        let normalized = normalize_todos_list(&drafts);

        assert_eq!(drafts, before);
        assert_eq!(normalized[0].id.as_deref(), Some("todo-1"));
        assert_eq!(normalized[0].priority.as_deref(), Some("medium"));
        assert_eq!(normalized[0].status.as_deref(), Some("pending"));
        assert_eq!(normalized[1].id.as_deref(), Some("custom"));
        assert_eq!(normalized[1].status.as_deref(), Some("completed"));
        assert_eq!(normalized[2].id.as_deref(), Some("todo-3"));
    }

    #[test]
    fn test_normalize_keeps_invalid_values() {
        let drafts = vec![TodoDraft::new("A").with_priority("urgent")];
        let normalized = normalize_todos_list(&drafts);
        assert_eq!(normalized[0].priority.as_deref(), Some("urgent"));
        assert!(validate_todos_list(&normalized).is_err());
    }

    #[test]
    fn test_normalize_can_produce_collision() {
        let drafts = vec![TodoDraft::new("A").with_id("todo-2"), TodoDraft::new("B")];
        let normalized = normalize_todos_list(&drafts);
        let err = validate_todos_list(&normalized).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
    }

    #[test]
    fn test_next_todo_id_skips_collisions() {
        let todos = vec![Todo::new("todo-2", "x"), Todo::new("todo-3", "y")];
        assert_eq!(next_todo_id(&todos), "todo-4");
        assert_eq!(next_todo_id(&[]), "todo-1");

        let todos = vec![Todo::new("alpha", "x")];
        assert_eq!(next_todo_id(&todos), "todo-2");
    }

    #[test]
    fn test_filters_are_anded() {
        let todos = vec![
            Todo::new("1", "a").with_priority(TodoPriority::High),
            Todo::new("2", "b")
                .with_priority(TodoPriority::High)
                .with_status(TodoStatus::Completed),
            Todo::new("3", "c").with_priority(TodoPriority::Low),
        ];

        let pending_high =
            filter_todos(&todos, Some(TodoStatus::Pending), Some(TodoPriority::High));
        assert_eq!(pending_high.len(), 1);
        assert_eq!(pending_high[0].id, "1");
        assert_eq!(filter_todos(&todos, None, None), todos);
        assert_eq!(filter_todos(&todos, None, Some(TodoPriority::Low)).len(), 1);
    }

    #[test]
    fn test_stats_and_completion_rate() {
        assert_eq!(completion_rate(&[]), 0.0);

        let todos = vec![
            Todo::new("1", "a").with_status(TodoStatus::Completed),
            Todo::new("2", "b"),
            Todo::new("3", "c").with_status(TodoStatus::Completed),
            Todo::new("4", "d").with_priority(TodoPriority::Low),
        ];
        let stats = get_todo_stats(&todos);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.count_status(TodoStatus::Completed), 2);
        assert_eq!(stats.count_status(TodoStatus::Cancelled), 0);
        assert!(!stats.status_counts.contains_key(&TodoStatus::Cancelled));
        assert_eq!(stats.count_priority(TodoPriority::Medium), 3);
        assert!((stats.completion_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_status("in_progress").unwrap(), TodoStatus::InProgress);
        assert!(parse_status("blocked")
            .unwrap_err()
            .to_string()
            .contains("pending, in_progress, completed, cancelled"));
        assert_eq!(parse_priority("low").unwrap(), TodoPriority::Low);
        assert!(parse_priority("").is_err());
    }
}
