mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use drawer_layout::prelude::*;

#[test]
fn second_request_while_settling_is_ignored() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());

    assert!(sheet.expand());
    sheet.on_frame(16);
    sheet.on_frame(32);
    assert!(!sheet.hide());
    assert!(sheet.is_animating());

    settle(&mut sheet, 48);
    assert_eq!(sheet.translation(), 0.0);
    assert_eq!(sheet.show_state(), ShowState::Expanded);
}

#[test]
fn named_targets_round_trip() {
    let content = MockNode::content(2);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());
    let events = record(&mut sheet);
    let mut now = 16;

    assert!(sheet.hide());
    now = settle(&mut sheet, now);
    assert_eq!(sheet.translation(), SHEET_HEIGHT);
    assert_eq!(handle.translation.get(), SHEET_HEIGHT);
    assert_eq!(sheet.show_state(), ShowState::Hidden);
    assert_eq!(count_settling(&events.borrow()), 1);

    events.borrow_mut().clear();
    assert!(sheet.expand());
    now = settle(&mut sheet, now);
    assert_eq!(sheet.translation(), 0.0);
    assert_eq!(sheet.show_state(), ShowState::Expanded);
    assert_eq!(count_settling(&events.borrow()), 1);

    events.borrow_mut().clear();
    assert!(sheet.peek(250.0));
    settle(&mut sheet, now);
    assert_eq!(sheet.translation(), 250.0);
    assert_eq!(sheet.show_state(), ShowState::Peek);
    assert_eq!(count_settling(&events.borrow()), 1);
}

#[test]
fn settle_reports_dragging_then_settling() {
    let mut sheet = sheet_with(MockNode::content(2), SheetConfig::default());
    let events = record(&mut sheet);

    sheet.peek(400.0);
    settle(&mut sheet, 16);

    let log = events.borrow();
    let states: Vec<ScrollingState> = log
        .iter()
        .filter_map(|event| match event {
            SheetEvent::ScrollingState { state } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![ScrollingState::Dragging, ScrollingState::Settling]);

    let offsets = scroll_changes(&log);
    assert_eq!(offsets.first(), Some(&0.0));
    assert_eq!(offsets.last(), Some(&400.0));
    assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn settling_already_at_target_still_reports_settling() {
    let mut sheet = sheet_with(MockNode::content(2), SheetConfig::default());
    let events = record(&mut sheet);

    sheet.expand();
    settle(&mut sheet, 16);

    assert_eq!(count_settling(&events.borrow()), 1);
    assert_eq!(sheet.show_state(), ShowState::Expanded);
}

#[test]
fn hide_to_uses_given_offset() {
    let mut sheet = sheet_with(MockNode::content(2), SheetConfig::default());

    assert!(sheet.hide_to(600.0));
    settle(&mut sheet, 16);

    assert_eq!(sheet.translation(), 600.0);
    assert_eq!(sheet.show_state(), ShowState::Hidden);
}

#[test]
fn hide_targets_locked_height() {
    let mut sheet = sheet_with(MockNode::content(2), SheetConfig::default());
    // A later layout pass does not move the hidden position
    sheet.on_layout(1000.0);

    sheet.hide();
    settle(&mut sheet, 16);
    assert_eq!(sheet.translation(), SHEET_HEIGHT);
}

#[test]
fn completion_runs_after_settling_notification() {
    let mut sheet = sheet_with(MockNode::content(2).translated(500.0), SheetConfig::default());
    let order = Rc::new(RefCell::new(Vec::new()));

    let listener_order = order.clone();
    sheet.on_event(move |event| {
        if let SheetEvent::ScrollingState {
            state: ScrollingState::Settling,
        } = event
        {
            listener_order.borrow_mut().push("settling");
        }
    });
    let completion_order = order.clone();
    sheet.expand_with(120, move |outcome| {
        assert_eq!(outcome, SettleOutcome::Finished);
        completion_order.borrow_mut().push("complete");
    });

    settle(&mut sheet, 16);
    assert_eq!(*order.borrow(), vec!["settling", "complete"]);
}

#[test]
fn custom_duration_is_honoured() {
    let mut sheet = sheet_with(MockNode::content(2), SheetConfig::default());

    sheet.recover_with(200.0, 64, |_| {});
    sheet.on_frame(100);
    sheet.on_frame(132);
    assert!(sheet.is_animating());
    sheet.on_frame(164);
    assert!(!sheet.is_animating());
    assert_eq!(sheet.translation(), 200.0);
}

#[test]
fn pointer_events_dropped_while_settling() {
    let content = MockNode::content(2);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());

    sheet.peek(300.0);
    sheet.on_frame(16);
    assert!(!pointer(&mut sheet, PointerAction::Down, 100.0, 100.0, 20));
    assert!(!sheet.is_finger_down());
    assert_eq!(sheet.gesture_state(), GestureState::Idle);

    let now = settle(&mut sheet, 32);
    // The rest of the dropped gesture is ignored too
    assert!(!pointer(&mut sheet, PointerAction::Move, 100.0, 400.0, now));
    assert!(handle.received.borrow().is_empty());
}

#[test]
fn settle_after_drag_continues_from_dragged_offset() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());
    let events = record(&mut sheet);

    drag(&mut sheet, &[400.0, 380.0, 340.0, 300.0]);
    pointer(&mut sheet, PointerAction::Up, 100.0, 300.0, 64);
    assert_eq!(sheet.translation(), 260.0);

    events.borrow_mut().clear();
    sheet.peek(300.0);
    settle(&mut sheet, 100);

    let offsets = scroll_changes(&events.borrow());
    assert_eq!(offsets.first(), Some(&260.0));
    assert_eq!(sheet.translation(), 300.0);
}

#[test]
fn release_during_settle_ends_gesture() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());

    pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0);
    assert!(sheet.is_finger_down());
    assert!(sheet.disallows_parent_intercept());

    assert!(sheet.expand());
    sheet.on_frame(16);
    assert!(!pointer(&mut sheet, PointerAction::Up, 100.0, 400.0, 20));

    assert!(!sheet.is_finger_down());
    assert!(!sheet.disallows_parent_intercept());
    assert_eq!(sheet.gesture_state(), GestureState::Idle);

    settle(&mut sheet, 32);
    assert_eq!(sheet.show_state(), ShowState::Expanded);
}
