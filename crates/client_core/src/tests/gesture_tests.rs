use super::*;

fn drag(interpreter: &mut GestureInterpreter, dx: f64, dy: f64) -> Option<GestureOutcome> {
    assert!(interpreter.start(0, 200.0, 300.0), "drag should start");
    interpreter.move_to(200.0 + dx, 300.0 + dy);
    interpreter.end()
}

#[test]
fn live_transform_tracks_offset() {
    let mut interpreter = GestureInterpreter::new();
    assert!(interpreter.start(0, 10.0, 20.0));

    let transform = interpreter.move_to(70.0, 5.0).expect("dragging");
    assert_eq!(transform.dx, 60.0);
    assert_eq!(transform.dy, -15.0);
    assert_eq!(transform.rotation_deg, 6.0);
    assert!((transform.opacity - 0.8).abs() < 1e-9);
    assert_eq!(interpreter.transform(), transform);
}

#[test]
fn opacity_is_not_clamped_while_dragging() {
    let transform = CardTransform::from_offset(-450.0, 0.0);
    assert_eq!(transform.rotation_deg, -45.0);
    assert!((transform.opacity - (-0.5)).abs() < 1e-9);
}

#[test]
fn below_threshold_cancels_and_clears_transform() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(drag(&mut interpreter, 50.0, 30.0), Some(GestureOutcome::Cancel));
    assert!(interpreter.is_idle());
    assert!(interpreter.transform().is_identity());
}

#[test]
fn exactly_threshold_is_still_a_cancel() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(drag(&mut interpreter, 100.0, 0.0), Some(GestureOutcome::Cancel));
    assert_eq!(drag(&mut interpreter, -100.0, 0.0), Some(GestureOutcome::Cancel));
}

#[test]
fn right_past_threshold_accepts() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(drag(&mut interpreter, 150.0, 0.0), Some(GestureOutcome::Accept));
    assert_eq!(interpreter.exit_direction(), Some(SwipeDirection::Right));
}

#[test]
fn left_past_threshold_rejects() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(drag(&mut interpreter, -150.0, 0.0), Some(GestureOutcome::Reject));
    assert_eq!(interpreter.exit_direction(), Some(SwipeDirection::Left));
}

#[test]
fn lower_cards_ignore_input() {
    let mut interpreter = GestureInterpreter::new();
    assert!(!interpreter.start(1, 0.0, 0.0));
    assert!(!interpreter.start(2, 0.0, 0.0));
    assert_eq!(interpreter.move_to(500.0, 0.0), None);
    assert_eq!(interpreter.end(), None);
}

#[test]
fn release_without_drag_is_a_no_op() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(interpreter.end(), None);
    assert!(interpreter.is_idle());
}

#[test]
fn release_without_move_cancels() {
    let mut interpreter = GestureInterpreter::new();
    assert!(interpreter.start(0, 5.0, 5.0));
    assert_eq!(interpreter.end(), Some(GestureOutcome::Cancel));
}

#[test]
fn repeated_release_classifies_once() {
    let mut interpreter = GestureInterpreter::new();
    assert_eq!(drag(&mut interpreter, 150.0, 0.0), Some(GestureOutcome::Accept));
    assert_eq!(interpreter.end(), None);
    assert_eq!(interpreter.end(), None);
}

#[test]
fn exiting_card_refuses_new_input_until_finished() {
    let mut interpreter = GestureInterpreter::new();
    drag(&mut interpreter, -300.0, 0.0);

    assert!(!interpreter.start(0, 0.0, 0.0));
    assert!(!interpreter.commit(SwipeDirection::Right));
    assert_eq!(interpreter.move_to(10.0, 10.0), None);

    assert!(interpreter.finish_exit());
    assert!(!interpreter.finish_exit());
    assert!(interpreter.start(0, 0.0, 0.0));
}

#[test]
fn commit_only_from_idle() {
    let mut interpreter = GestureInterpreter::new();
    assert!(interpreter.start(0, 0.0, 0.0));
    assert!(!interpreter.commit(SwipeDirection::Left));

    interpreter.reset();
    assert!(interpreter.commit(SwipeDirection::Left));
    assert_eq!(interpreter.exit_direction(), Some(SwipeDirection::Left));
}

#[test]
fn outcome_maps_to_direction() {
    assert_eq!(
        GestureOutcome::from(SwipeDirection::Right),
        GestureOutcome::Accept
    );
    assert_eq!(GestureOutcome::Cancel.direction(), None);
    assert_eq!(GestureOutcome::classify(-101.0), GestureOutcome::Reject);
}
