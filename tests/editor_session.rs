use std::time::Duration;

use egui::pos2;
use flipbook::{Command, Editor, EditorConfig, PixelCanvas, PlaybackMode, RasterSurface, Tool};

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn editor() -> Editor<PixelCanvas> {
    let config = EditorConfig {
        canvas_width: 64,
        canvas_height: 64,
        ..EditorConfig::default()
    };
    Editor::new(&config).unwrap()
}

fn alpha(editor: &Editor<PixelCanvas>, x: u32, y: u32) -> u8 {
    editor.flipbook().current().surface().pixel(x, y)[3]
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EditorConfig {
        history_depth: 1,
        ..EditorConfig::default()
    };
    assert!(Editor::<PixelCanvas>::new(&config).is_err());
}

#[test]
fn test_pointer_input_draws_through_the_tracker() {
    let mut editor = editor();
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    editor.pointer(pos2(40.0, 10.0), false, ms(40));

    assert!(alpha(&editor, 20, 10) > 0);
    assert_eq!(editor.flipbook().current().history().len(), 2);
}

#[test]
fn test_drawing_tick_feeds_throttled_move() {
    let mut editor = editor();
    editor.start(ms(0));
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    // Inside the throttle interval, so not forwarded yet
    editor.pointer(pos2(40.0, 10.0), true, ms(5));
    assert!(editor.flipbook().current().surface().is_blank());

    assert!(editor.update(ms(20)));
    assert!(alpha(&editor, 20, 10) > 0);
}

#[test]
fn test_idle_ticks_do_not_repeat_samples() {
    let mut editor = editor();
    editor.start(ms(0));
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    let revision = editor.flipbook().current().surface().revision();

    editor.update(ms(20));
    editor.update(ms(40));
    assert_eq!(editor.flipbook().current().surface().revision(), revision);
}

#[test]
fn test_playback_cycles_one_frame_per_tick() {
    let mut editor = editor();
    editor.execute(Command::AdvanceFrame);
    editor.execute(Command::AdvanceFrame);
    assert_eq!(editor.flipbook().len(), 3);

    editor.start(ms(0));
    editor.execute(Command::TogglePlayback);
    assert_eq!(editor.mode(), PlaybackMode::Playing);

    let mut visited = Vec::new();
    for t in [100, 200, 300, 400] {
        assert!(editor.update(ms(t)));
        visited.push(editor.flipbook().current_index());
    }
    assert_eq!(visited, vec![0, 1, 2, 0]);
    assert_eq!(editor.flipbook().len(), 3);

    // A long stall still advances only one frame
    editor.update(ms(1050));
    assert_eq!(editor.flipbook().current_index(), 1);
    assert!(!editor.update(ms(1060)));
}

#[test]
fn test_pointer_is_ignored_while_playing() {
    let mut editor = editor();
    editor.start(ms(0));
    editor.toggle_playback();

    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    assert!(!editor.flipbook().is_drawing());
    assert!(editor.flipbook().current().surface().is_blank());
}

#[test]
fn test_playback_hides_onion_skin_until_stopped() {
    let mut editor = editor();
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    editor.pointer(pos2(40.0, 10.0), false, ms(40));
    editor.advance_frame();
    assert!(!editor.flipbook().onion_overlay().is_blank());

    editor.toggle_playback();
    assert!(editor.flipbook().onion_overlay().is_blank());

    editor.toggle_playback();
    assert_eq!(editor.mode(), PlaybackMode::Drawing);
    assert!(!editor.flipbook().onion_overlay().is_blank());
}

#[test]
fn test_starting_playback_finishes_the_gesture() {
    let mut editor = editor();
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    assert!(editor.flipbook().is_drawing());

    editor.toggle_playback();
    assert!(!editor.flipbook().is_drawing());
    assert_eq!(editor.flipbook().current().history().len(), 2);
}

#[test]
fn test_paste_lands_at_last_pointer_position() {
    let mut editor = editor();
    editor.pointer(pos2(4.0, 15.0), true, ms(0));
    editor.pointer(pos2(60.0, 15.0), true, ms(20));
    editor.pointer(pos2(60.0, 15.0), false, ms(40));

    editor.execute(Command::SetTool(Tool::Select));
    editor.pointer(pos2(10.0, 10.0), true, ms(60));
    editor.pointer(pos2(30.0, 20.0), true, ms(80));
    editor.pointer(pos2(30.0, 20.0), false, ms(100));
    editor.execute(Command::Copy);

    // Hovering moves the paste target without drawing
    editor.pointer(pos2(10.0, 40.0), false, ms(120));
    editor.execute(Command::Paste);
    assert_eq!(alpha(&editor, 20, 45), 255);
}

#[test]
fn test_unknown_tool_names_are_ignored() {
    let mut editor = editor();
    editor.set_tool_by_name("circle");
    assert_eq!(editor.flipbook().current().settings().tool, Tool::Circle);
    editor.set_tool_by_name("airbrush");
    assert_eq!(editor.flipbook().current().settings().tool, Tool::Circle);
}

#[test]
fn test_undo_is_ignored_mid_gesture() {
    let mut editor = editor();
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    editor.pointer(pos2(40.0, 10.0), false, ms(40));

    editor.pointer(pos2(5.0, 30.0), true, ms(60));
    editor.pointer(pos2(40.0, 30.0), true, ms(80));
    editor.execute(Command::Undo);
    assert!(alpha(&editor, 20, 10) > 0);
    assert!(editor.flipbook().is_drawing());
}

#[test]
fn test_navigation_during_playback_keeps_onion_hidden() {
    let mut editor = editor();
    editor.pointer(pos2(5.0, 10.0), true, ms(0));
    editor.pointer(pos2(40.0, 10.0), true, ms(20));
    editor.pointer(pos2(40.0, 10.0), false, ms(40));
    editor.advance_frame();
    editor.retreat_frame();

    editor.start(ms(0));
    editor.toggle_playback();
    editor.execute(Command::AdvanceFrame);
    assert!(editor.is_playing());
    assert!(editor.flipbook().onion_overlay().is_blank());

    editor.execute(Command::RetreatFrame);
    editor.execute(Command::AdvanceFrame);
    assert!(editor.flipbook().onion_overlay().is_blank());

    editor.toggle_playback();
    assert_eq!(editor.flipbook().current_index(), 1);
    assert!(!editor.flipbook().onion_overlay().is_blank());
}
