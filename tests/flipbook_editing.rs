use egui::{Pos2, pos2};
use flipbook::{EditorConfig, Flipbook, PixelCanvas, PointerSample, Tool};

fn config() -> EditorConfig {
    EditorConfig {
        canvas_width: 64,
        canvas_height: 64,
        ..EditorConfig::default()
    }
}

fn flipbook() -> Flipbook<PixelCanvas> {
    Flipbook::new(&config()).unwrap()
}

fn sample(book: &mut Flipbook<PixelCanvas>, x: f32, y: f32, pressed: bool) {
    book.handle_sample(PointerSample::new(Pos2::new(x, y), pressed), false);
}

/// Press on the first point, drag through the rest, release on the last
fn gesture(book: &mut Flipbook<PixelCanvas>, points: &[(f32, f32)]) {
    let (x, y) = points[0];
    sample(book, x, y, true);
    for &(x, y) in &points[1..] {
        sample(book, x, y, true);
    }
    let (x, y) = points[points.len() - 1];
    sample(book, x, y, false);
}

fn pixels(book: &Flipbook<PixelCanvas>) -> Vec<u8> {
    book.current().surface().image().as_raw().clone()
}

fn alpha(book: &Flipbook<PixelCanvas>, x: u32, y: u32) -> u8 {
    book.current().surface().pixel(x, y)[3]
}

#[test]
fn test_undo_and_redo_walk_back_to_blank_and_forward_again() {
    let mut book = flipbook();
    let blank = pixels(&book);

    let mut states = Vec::new();
    for i in 0..5 {
        let y = 8.0 + 10.0 * i as f32;
        gesture(&mut book, &[(4.0, y), (60.0, y)]);
        states.push(pixels(&book));
    }

    for _ in 0..5 {
        book.undo();
    }
    assert_eq!(pixels(&book), blank);
    assert!(!book.current().history().can_undo());

    // Undo past the baseline is a no-op
    book.undo();
    assert_eq!(pixels(&book), blank);

    for _ in 0..5 {
        book.redo();
    }
    assert_eq!(pixels(&book), states[4]);
    assert!(!book.current().history().can_redo());
}

#[test]
fn test_history_keeps_at_most_fifty_states() {
    let mut book = flipbook();
    for i in 0..60 {
        let y = 1.0 + i as f32;
        gesture(&mut book, &[(2.0, y), (30.0, y)]);
    }
    assert_eq!(book.current().history().len(), 50);

    let mut undos = 0;
    while book.current().history().can_undo() {
        book.undo();
        undos += 1;
    }
    assert_eq!(undos, 49);
    // The blank baseline was evicted, so the oldest retained state still has strokes
    assert!(!book.current().surface().is_blank());
}

#[test]
fn test_new_stroke_after_undo_discards_redo() {
    let mut book = flipbook();
    gesture(&mut book, &[(4.0, 10.0), (60.0, 10.0)]);
    gesture(&mut book, &[(4.0, 30.0), (60.0, 30.0)]);
    book.undo();
    assert!(book.current().history().can_redo());

    gesture(&mut book, &[(4.0, 50.0), (60.0, 50.0)]);
    assert!(!book.current().history().can_redo());

    let before = pixels(&book);
    book.redo();
    assert_eq!(pixels(&book), before);
    assert_eq!(alpha(&book, 30, 30), 0);
}

#[test]
fn test_frames_are_append_only() {
    let mut book = flipbook();
    gesture(&mut book, &[(4.0, 10.0), (60.0, 10.0)]);

    book.retreat();
    assert_eq!(book.current_index(), 0);
    assert_eq!(book.len(), 1);

    book.advance();
    assert_eq!(book.len(), 2);
    assert_eq!(book.current_index(), 1);
    assert!(book.current().surface().is_blank());

    book.retreat();
    assert_eq!(book.current_index(), 0);
    assert_eq!(alpha(&book, 30, 10), 255);

    book.advance();
    assert_eq!(book.len(), 2);
    book.advance();
    assert_eq!(book.len(), 3);
    assert_eq!(book.position_label(), "3 / 3");
}

#[test]
fn test_new_frames_inherit_tool_settings() {
    let mut book = flipbook();
    book.set_tool(Tool::Eraser);
    book.set_stroke_width(3.0);
    book.advance();
    assert_eq!(book.current().settings().tool, Tool::Eraser);
    assert_eq!(book.current().settings().stroke_width, 3.0);
}

#[test]
fn test_leaving_the_canvas_and_coming_back_does_not_connect() {
    let mut book = flipbook();
    sample(&mut book, 5.0, 5.0, true);
    sample(&mut book, -50.0, -50.0, true);
    sample(&mut book, 5.0, 5.0, true);
    assert!(book.current().surface().is_blank());

    sample(&mut book, 25.0, 5.0, true);
    assert!(alpha(&book, 15, 5) > 0);
    sample(&mut book, 25.0, 5.0, false);
    assert_eq!(book.current().history().len(), 2);
}

#[test]
fn test_line_preview_keeps_only_the_final_segment() {
    let mut book = flipbook();
    book.set_tool(Tool::Line);
    gesture(&mut book, &[(10.0, 10.0), (50.0, 10.0), (10.0, 50.0)]);

    assert_eq!(alpha(&book, 40, 10), 0);
    assert!(alpha(&book, 10, 30) > 0);
    assert_eq!(book.current().history().len(), 2);
}

#[test]
fn test_square_preview_does_not_leave_ghosts() {
    let mut book = flipbook();
    book.set_tool(Tool::Square);
    gesture(&mut book, &[(10.0, 10.0), (50.0, 50.0), (20.0, 20.0)]);

    assert_eq!(alpha(&book, 50, 30), 0);
    assert!(alpha(&book, 20, 15) > 0);
}

#[test]
fn test_selection_is_not_committed_and_deselect_is_idempotent() {
    let mut book = flipbook();
    gesture(&mut book, &[(4.0, 15.0), (60.0, 15.0)]);
    let drawn = pixels(&book);
    let committed = book.current().history().len();

    book.set_tool(Tool::Select);
    gesture(&mut book, &[(10.0, 10.0), (30.0, 20.0)]);
    assert!(book.current().selection().active);
    assert!(!book.current().overlay().is_blank());
    assert_eq!(book.current().history().len(), committed);

    book.deselect();
    book.deselect();
    assert!(!book.current().selection().active);
    assert!(book.current().overlay().is_blank());
    assert_eq!(pixels(&book), drawn);
}

#[test]
fn test_copy_cut_and_paste_selection() {
    let mut book = flipbook();
    gesture(&mut book, &[(4.0, 15.0), (60.0, 15.0)]);
    book.set_tool(Tool::Select);
    gesture(&mut book, &[(10.0, 10.0), (30.0, 20.0)]);

    book.copy_selection();
    let region = book.clipboard().unwrap();
    assert_eq!((region.width(), region.height()), (20, 10));

    book.cut_selection();
    assert_eq!(alpha(&book, 20, 15), 0);
    assert_eq!(alpha(&book, 50, 15), 255);

    book.paste_selection(pos2(10.0, 40.0));
    assert_eq!(alpha(&book, 20, 45), 255);

    // Paste and cut are separate undo steps
    book.undo();
    assert_eq!(alpha(&book, 20, 45), 0);
    book.undo();
    assert_eq!(alpha(&book, 20, 15), 255);
}

#[test]
fn test_clipboard_operations_without_content_are_noops() {
    let mut book = flipbook();
    book.paste_selection(pos2(10.0, 10.0));
    assert!(book.current().surface().is_blank());
    assert!(book.current().history().is_empty());

    gesture(&mut book, &[(4.0, 15.0), (60.0, 15.0)]);
    let before = pixels(&book);
    let committed = book.current().history().len();

    book.delete_selection();
    book.copy_selection();
    book.cut_selection();
    assert!(book.clipboard().is_none());
    assert_eq!(pixels(&book), before);
    assert_eq!(book.current().history().len(), committed);
}

#[test]
fn test_onion_skin_shows_previous_frame_faded() {
    let mut book = flipbook();
    assert!(book.onion_overlay().is_blank());

    gesture(&mut book, &[(4.0, 10.0), (60.0, 10.0)]);
    book.advance();
    gesture(&mut book, &[(4.0, 40.0), (60.0, 40.0)]);
    book.advance();
    assert_eq!(book.current_index(), 2);

    let onion = book.onion_overlay();
    let faded = i32::from(onion.pixel(30, 40)[3]);
    let expected = (255.0 * book.onion_skin().opacity).round() as i32;
    assert!((faded - expected).abs() <= 1, "alpha {faded}, expected about {expected}");
    assert_eq!(onion.pixel(30, 10)[3], 0);

    book.set_onion_skin(false, 0.3);
    assert!(book.onion_overlay().is_blank());
}

#[test]
fn test_first_frame_has_no_onion_skin() {
    let mut book = flipbook();
    gesture(&mut book, &[(4.0, 10.0), (60.0, 10.0)]);
    book.advance();
    assert!(!book.onion_overlay().is_blank());
    book.retreat();
    assert!(book.onion_overlay().is_blank());
}

#[test]
fn test_eraser_removes_committed_stroke_and_undo_restores_it() {
    let mut book = flipbook();
    gesture(&mut book, &[(4.0, 20.0), (60.0, 20.0)]);

    book.set_tool(Tool::Eraser);
    gesture(&mut book, &[(30.0, 4.0), (30.0, 60.0)]);
    assert_eq!(alpha(&book, 30, 20), 0);
    assert_eq!(alpha(&book, 10, 20), 255);
    assert_eq!(book.current().history().len(), 3);

    book.undo();
    assert_eq!(alpha(&book, 30, 20), 255);
}

#[test]
fn test_changing_tool_drops_the_selection() {
    let mut book = flipbook();
    book.set_tool(Tool::Select);
    gesture(&mut book, &[(10.0, 10.0), (30.0, 20.0)]);
    assert!(book.current().selection().active);

    book.set_tool(Tool::Pen);
    assert!(!book.current().selection().active);
    assert!(book.current().overlay().is_blank());

    book.copy_selection();
    assert!(book.clipboard().is_none());
}
