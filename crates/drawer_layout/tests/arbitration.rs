mod common;

use common::*;
use drawer_layout::prelude::*;

#[test]
fn small_or_sideways_moves_stay_with_content() {
    let content = MockNode::content(2).translated(300.0);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());

    assert!(pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0));
    // Within slop
    pointer(&mut sheet, PointerAction::Move, 100.0, 405.0, 16);
    // Beyond slop but mostly horizontal
    pointer(&mut sheet, PointerAction::Move, 130.0, 412.0, 32);

    assert_eq!(sheet.gesture_state(), GestureState::Arbitrating);
    assert_eq!(sheet.translation(), 300.0);

    let received = handle.received.borrow();
    assert_eq!(received.len(), 3);
    // Forwarded in content coordinates
    assert_eq!(received[0].y, 100.0);
    assert_eq!(received[1].y, 105.0);
    assert_eq!(received[2].x, 130.0);
    assert_eq!(received[2].raw_y, 412.0);
}

#[test]
fn sheet_follows_drag_once_content_cannot_scroll() {
    let content = MockNode::content(2).translated(300.0);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());

    drag(&mut sheet, &[400.0, 380.0, 340.0, 300.0]);

    assert_eq!(sheet.gesture_state(), GestureState::SheetOwns);
    // 380 claims, 340 cancels the content, 300 moves the sheet by 40
    assert_eq!(sheet.translation(), 260.0);
    assert_eq!(handle.translation.get(), 260.0);
    assert_eq!(handle.actions(), vec![PointerAction::Down, PointerAction::Cancel]);
    assert!(sheet.disallows_parent_intercept());
}

#[test]
fn damping_scales_upward_drag() {
    let config = SheetConfig {
        damping_down: 0.5,
        ..Default::default()
    };
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), config);

    drag(&mut sheet, &[400.0, 380.0, 340.0, 300.0]);

    // The final 40px finger travel moves the sheet 20px
    assert_eq!(sheet.translation(), 280.0);
}

#[test]
fn damping_up_scales_downward_drag() {
    let config = SheetConfig {
        damping_up: 0.25,
        ..Default::default()
    };
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), config);

    drag(&mut sheet, &[400.0, 440.0, 480.0, 560.0]);

    assert_eq!(sheet.translation(), 320.0);
}

#[test]
fn bottom_only_never_commits_negative_offsets() {
    let config = SheetConfig {
        direction: SheetDirection::BottomOnly,
        ..Default::default()
    };
    let mut sheet = sheet_with(MockNode::content(2), config);
    let events = record(&mut sheet);

    drag(&mut sheet, &[400.0, 380.0, 340.0, 300.0, 250.0]);

    assert_eq!(sheet.translation(), 0.0);
    let changes = scroll_changes(&events.borrow());
    assert!(!changes.is_empty());
    assert!(changes.iter().all(|offset| *offset == 0.0));
}

#[test]
fn top_only_never_commits_positive_offsets() {
    let config = SheetConfig {
        direction: SheetDirection::TopOnly,
        ..Default::default()
    };
    let mut sheet = sheet_with(MockNode::content(2), config);
    let events = record(&mut sheet);

    drag(&mut sheet, &[100.0, 120.0, 160.0, 200.0]);

    assert_eq!(sheet.translation(), 0.0);
    assert!(scroll_changes(&events.borrow()).iter().all(|offset| *offset <= 0.0));
}

#[test]
fn unconstrained_drag_moves_past_expanded_in_both_directions() {
    let mut sheet = sheet_with(MockNode::content(2), SheetConfig::default());
    drag(&mut sheet, &[100.0, 120.0, 160.0, 200.0]);
    assert_eq!(sheet.translation(), 40.0);
}

#[test]
fn content_that_never_scrolls_keeps_sheet_ownership() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());

    pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0);
    pointer(&mut sheet, PointerAction::Move, 100.0, 380.0, 16);
    for (step, y) in [340.0, 300.0, 350.0, 420.0, 380.0].into_iter().enumerate() {
        pointer(&mut sheet, PointerAction::Move, 100.0, y, 32 + step as u64 * 16);
        assert_eq!(sheet.gesture_state(), GestureState::SheetOwns);
    }
}

#[test]
fn content_that_always_scrolls_never_returns_to_sheet() {
    let content = MockNode::content(2).translated(300.0).scrollable(true, true);
    let mut sheet = sheet_with(content, SheetConfig::default());

    pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0);
    pointer(&mut sheet, PointerAction::Move, 100.0, 380.0, 16);
    assert_eq!(sheet.gesture_state(), GestureState::SheetOwns);

    for (step, y) in [360.0, 340.0, 420.0, 500.0, 380.0].into_iter().enumerate() {
        pointer(&mut sheet, PointerAction::Move, 100.0, y, 32 + step as u64 * 16);
        assert_eq!(sheet.gesture_state(), GestureState::ContentOwns);
        assert_eq!(sheet.translation(), 300.0);
    }
}

#[test]
fn gesture_hands_off_to_content_at_expanded_and_back() {
    let content = MockNode::content(2).translated(300.0).scrollable(false, true);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());
    let events = record(&mut sheet);

    pointer(&mut sheet, PointerAction::Down, 100.0, 500.0, 0);
    pointer(&mut sheet, PointerAction::Move, 100.0, 480.0, 16);
    pointer(&mut sheet, PointerAction::Move, 100.0, 460.0, 32);
    pointer(&mut sheet, PointerAction::Move, 100.0, 300.0, 48);
    assert_eq!(sheet.translation(), 140.0);
    assert_eq!(sheet.gesture_state(), GestureState::SheetOwns);

    // Past the expanded position the content can scroll down again
    pointer(&mut sheet, PointerAction::Move, 100.0, 150.0, 64);
    assert_eq!(sheet.translation(), 0.0);
    assert_eq!(sheet.gesture_state(), GestureState::ContentOwns);
    assert_eq!(sheet.scrolling_state(), ScrollingState::Settling);

    pointer(&mut sheet, PointerAction::Move, 100.0, 100.0, 80);
    assert_eq!(sheet.translation(), 0.0);

    // Reversing hits the content's top edge and the sheet takes over again
    pointer(&mut sheet, PointerAction::Move, 100.0, 200.0, 96);
    assert_eq!(sheet.gesture_state(), GestureState::SheetOwns);
    pointer(&mut sheet, PointerAction::Move, 100.0, 260.0, 112);
    assert_eq!(sheet.translation(), 60.0);

    assert_eq!(
        handle.actions(),
        vec![
            PointerAction::Down,
            PointerAction::Cancel,
            PointerAction::Down,
            PointerAction::Move,
            PointerAction::Move,
            PointerAction::Cancel,
        ]
    );
    // The replayed down lands where the finger is, in content coordinates
    assert_eq!(handle.received.borrow()[2].y, 150.0);

    let finger_ups: Vec<f32> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            SheetEvent::FingerUp { velocity_y } => Some(*velocity_y),
            _ => None,
        })
        .collect();
    assert_eq!(finger_ups, vec![0.0]);
}

#[test]
fn locks_clamp_committed_offset() {
    let config = SheetConfig {
        lock_top: Some(100.0),
        lock_bottom: Some(500.0),
        ..Default::default()
    };
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), config);

    drag(&mut sheet, &[500.0, 480.0, 460.0, 60.0]);
    assert_eq!(sheet.translation(), 100.0);

    pointer(&mut sheet, PointerAction::Up, 100.0, 60.0, 100);
    drag(&mut sheet, &[150.0, 170.0, 190.0, 700.0]);
    assert_eq!(sheet.translation(), 500.0);
}

#[test]
fn release_reports_finger_up_before_scroll_release() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());
    let events = record(&mut sheet);

    drag(&mut sheet, &[400.0, 380.0, 340.0, 300.0]);
    events.borrow_mut().clear();
    pointer(&mut sheet, PointerAction::Up, 100.0, 290.0, 64);

    let log = events.borrow();
    assert!(matches!(log.first(), Some(SheetEvent::FingerUp { .. })));
    match log.last() {
        Some(SheetEvent::ScrollRelease { offset, .. }) => assert_eq!(*offset, 250.0),
        other => panic!("expected a scroll release last, got {other:?}"),
    }
    assert!(!sheet.is_finger_down());
    assert!(!sheet.disallows_parent_intercept());
    assert_eq!(sheet.gesture_state(), GestureState::Idle);
}

#[test]
fn release_velocity_follows_the_finger() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());
    let events = record(&mut sheet);

    pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0);
    pointer(&mut sheet, PointerAction::Move, 100.0, 380.0, 10);
    pointer(&mut sheet, PointerAction::Move, 100.0, 360.0, 20);
    pointer(&mut sheet, PointerAction::Move, 100.0, 340.0, 30);
    pointer(&mut sheet, PointerAction::Up, 100.0, 320.0, 40);

    let release = events.borrow().iter().find_map(|event| match event {
        SheetEvent::ScrollRelease { velocity_y, .. } => Some(*velocity_y),
        _ => None,
    });
    // Samples restart when the sheet takes over at 360
    let velocity = release.expect("sheet held the gesture");
    assert!(velocity < 0.0);
    assert!((velocity + 2000.0).abs() < 1.0);
}

#[test]
fn horizontal_intent_is_reported() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());
    let events = record(&mut sheet);

    pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0);
    pointer(&mut sheet, PointerAction::Move, 60.0, 402.0, 16);
    pointer(&mut sheet, PointerAction::Move, 20.0, 405.0, 32);
    pointer(&mut sheet, PointerAction::Up, 20.0, 405.0, 48);

    let horizontal: Vec<(f32, f32)> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            SheetEvent::HorizontalScroll { delta_x, delta_y, .. } => Some((*delta_x, *delta_y)),
            _ => None,
        })
        .collect();
    // 40px is within the horizontal slop, 80px is past it, release always reports
    assert_eq!(horizontal, vec![(80.0, -5.0), (80.0, -5.0)]);
    assert_eq!(sheet.translation(), 300.0);
}

#[test]
fn pointer_outside_content_is_not_handled() {
    let content = MockNode::content(2).translated(300.0);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());

    assert!(!pointer(&mut sheet, PointerAction::Down, 100.0, 100.0, 0));
    assert!(!sheet.is_finger_down());
    // Moves skip the hit test but there is no gesture to continue
    assert!(!pointer(&mut sheet, PointerAction::Move, 100.0, 500.0, 16));
    assert!(handle.received.borrow().is_empty());
}

#[test]
fn hit_test_can_be_disabled() {
    let config = SheetConfig {
        require_touch_under_target: false,
        ..Default::default()
    };
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), config);

    assert!(pointer(&mut sheet, PointerAction::Down, 100.0, 100.0, 0));
    assert!(sheet.is_finger_down());
}

#[test]
fn delegate_receives_events_in_content_coordinates() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    sheet.set_raw_event_delegate(move |event| sink.borrow_mut().push((event.action, event.y)));

    drag(&mut sheet, &[400.0, 380.0, 340.0, 300.0]);

    assert_eq!(
        *seen.borrow(),
        vec![
            (PointerAction::Down, 100.0),
            (PointerAction::Move, 80.0),
            (PointerAction::Move, 40.0),
            (PointerAction::Move, 0.0),
        ]
    );
}

#[test]
fn config_changes_apply_from_next_gesture() {
    let mut sheet = sheet_with(MockNode::content(2).translated(300.0), SheetConfig::default());

    pointer(&mut sheet, PointerAction::Down, 100.0, 400.0, 0);
    sheet.set_damping_down(0.5);
    pointer(&mut sheet, PointerAction::Move, 100.0, 380.0, 16);
    pointer(&mut sheet, PointerAction::Move, 100.0, 340.0, 32);
    pointer(&mut sheet, PointerAction::Move, 100.0, 300.0, 48);

    // The active gesture keeps the damping it started with
    assert_eq!(sheet.translation(), 260.0);
}

#[test]
fn tap_releases_parent_intercept() {
    let content = MockNode::content(2);
    let handle = content.handle();
    let mut sheet = sheet_with(content, SheetConfig::default());

    pointer(&mut sheet, PointerAction::Down, 100.0, 300.0, 0);
    assert!(sheet.disallows_parent_intercept());
    pointer(&mut sheet, PointerAction::Up, 100.0, 300.0, 16);

    assert_eq!(sheet.gesture_state(), GestureState::Idle);
    assert!(!sheet.disallows_parent_intercept());
    assert_eq!(handle.actions(), vec![PointerAction::Down, PointerAction::Up]);
}
