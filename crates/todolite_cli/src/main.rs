//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `todolite_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use todolite_core::{
    AddOutcome, DragEnd, ListRenderer, RowEvent, Session, SessionConfig,
};

fn main() {
    println!("todolite_core ping={}", todolite_core::ping());
    println!("todolite_core version={}", todolite_core::core_version());

    // Drive one add/toggle/reorder pass against a throwaway in-memory
    // store and print the rendered list.
    let root = std::env::temp_dir().join("todolite-cli-probe");
    let mut session = Session::open(SessionConfig::in_memory_under(root));
    println!("store_ready={}", session.is_store_ready());

    let ids: Vec<i64> = ["buy milk", "walk dog", "write report"]
        .into_iter()
        .enumerate()
        .filter_map(|(index, text)| {
            match session.submit_new_task(text, 1_000 + index as i64) {
                Ok(AddOutcome::Added(id)) => Some(id),
                _ => None,
            }
        })
        .collect();

    if let Some(first) = ids.first() {
        let _ = session.handle_row_event(*first, RowEvent::CheckboxClicked, 2_000);
    }
    session.apply_visual_move(2, 0);
    let _ = session.drag_ended(DragEnd {
        old_index: 2,
        new_index: 0,
    });

    let renderer = ListRenderer::new(false);
    for line in renderer.render_lines(session.view()) {
        println!("{line}");
    }
    if let Some(label) = session.task_count_label() {
        println!("{label}");
    }
}
