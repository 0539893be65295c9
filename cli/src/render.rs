//! Plain-text rendering of the store.

use std::fmt::Write;

use todo_core::{EditState, Filter, Store};

pub fn render(store: &Store) -> String {
    let mut out = String::new();
    let todos = store.todos();

    if !todos.is_empty() {
        let tabs: Vec<String> = Filter::VARIANTS
            .iter()
            .map(|&filter| {
                let count = match filter {
                    Filter::All => todos.len(),
                    Filter::Active => store.active_count(),
                    Filter::Completed => store.completed_count(),
                };
                if filter == store.filter() {
                    format!("[{filter} {count}]")
                } else {
                    format!(" {filter} {count} ")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", tabs.join(" "));
    }

    let visible = store.visible();
    if visible.is_empty() {
        render_empty(&mut out, store);
    } else {
        for (i, todo) in visible.iter().enumerate() {
            let mark = if todo.completed { 'x' } else { ' ' };
            match store.edit() {
                EditState::Editing { id, buffer } if *id == todo.id => {
                    let _ = writeln!(out, "{:>3}. [{mark}] editing: {buffer}", i + 1);
                }
                _ => {
                    let _ = writeln!(out, "{:>3}. [{mark}] {}", i + 1, todo.text);
                }
            }
        }
    }

    if !todos.is_empty() {
        let completed = store.completed_count();
        let _ = write!(out, "{} active, {completed} completed", store.active_count());
        if completed > 0 {
            out.push_str("  (`clear` removes completed)");
        }
        out.push('\n');
    }
    out
}

fn render_empty(out: &mut String, store: &Store) {
    if store.todos().is_empty() {
        out.push_str("No todos yet\nAdd your first todo above to get started!\n");
        return;
    }
    let (title, other) = match store.filter() {
        Filter::Completed => ("No completed todos", Filter::Active),
        Filter::Active => ("No active todos", Filter::Completed),
        // an unfiltered view of a non-empty list is never empty
        Filter::All => ("No active todos", Filter::Active),
    };
    let _ = writeln!(out, "{title}\nSwitch to \"{other}\" to see other todos");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use todo_core::{HttpResponse, Todo, TodoClient};
    use uuid::Uuid;

    fn store(items: &[(&str, bool)]) -> Store {
        let todos: Vec<Todo> = items
            .iter()
            .enumerate()
            .map(|(i, (text, completed))| Todo {
                id: Uuid::from_u128(i as u128 + 1),
                text: text.to_string(),
                completed: *completed,
                created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            })
            .collect();
        let mut store = Store::new(TodoClient::new("http://todo.test"));
        let pending = store.begin_refresh();
        store
            .complete(
                pending,
                vec![Ok(HttpResponse::new(
                    200,
                    serde_json::to_string(&todos).unwrap(),
                ))],
            )
            .unwrap();
        store
    }

    #[test]
    fn empty_list() {
        let out = render(&store(&[]));
        assert_eq!(out, "No todos yet\nAdd your first todo above to get started!\n");
    }

    #[test]
    fn tabs_items_and_footer() {
        let out = render(&store(&[("Buy milk", false), ("Walk dog", true)]));
        assert_eq!(
            out,
            "[all 2]  active 1   completed 1 \n  \
             1. [ ] Buy milk\n  \
             2. [x] Walk dog\n\
             1 active, 1 completed  (`clear` removes completed)\n"
        );
    }

    #[test]
    fn edit_marker_shows_buffer() {
        let mut store = store(&[("old", false)]);
        store.start_edit(Uuid::from_u128(1), "new");
        assert!(render(&store).contains("  1. [ ] editing: new\n"));
    }

    #[test]
    fn empty_filtered_views_hint_the_other_filter() {
        let mut store = store(&[("open", false)]);
        store.set_filter(Filter::Completed);
        let out = render(&store);
        assert!(out.contains("No completed todos\nSwitch to \"active\" to see other todos\n"));
        assert!(!out.contains("(`clear`"));

        let mut store = self::store(&[("done", true)]);
        store.set_filter(Filter::Active);
        let out = render(&store);
        assert!(out.contains("No active todos\nSwitch to \"completed\" to see other todos\n"));
    }
}
