//! Property-based invariant tests for the native event queue.
//!
//! 1. At most one Resized and one SizeChanged are ever pending.
//! 2. The pending resize carries the latest size.
//! 3. Non-coalesced events keep their relative order.
//! 4. Pumping drains the queue and leaves no dispatch in progress.

use std::rc::Rc;

use proptest::prelude::*;
use trellis_core::{Point, Rect, Size};
use trellis_window::{
    NativeEvent, NativeWindow, PlatformWindow, SurfaceWindow, WindowEvent, WindowEventKind,
};

struct Quiet;

impl SurfaceWindow for Quiet {}

impl PlatformWindow for Quiet {
    fn surface_size(&self) -> Size {
        Size::new(10, 10)
    }
    fn invalidate(&self, _area: Rect) {}
    fn render(&self) {}
    fn close(&self) {}
    fn mouse_position(&self) -> Point {
        Point::ZERO
    }
}

fn window() -> NativeWindow {
    let quiet = Rc::new(Quiet);
    NativeWindow::new(quiet.clone(), quiet)
}

fn event_strategy() -> impl Strategy<Value = WindowEvent> {
    let size = (0u16..500, 0u16..500).prop_map(|(w, h)| Size::new(w, h));
    prop_oneof![
        size.clone().prop_map(WindowEvent::Resized),
        size.prop_map(WindowEvent::SizeChanged),
        Just(WindowEvent::Paint),
        Just(WindowEvent::FocusGained),
        Just(WindowEvent::FocusLost),
        Just(WindowEvent::Leave),
    ]
}

fn count(queue: &[NativeEvent], kind: WindowEventKind) -> usize {
    queue.iter().filter(|event| event.is_window(kind)).count()
}

proptest! {
    #[test]
    fn one_pending_resize_per_kind(events in prop::collection::vec(event_strategy(), 0..64)) {
        let window = window();
        for event in &events {
            window.push_event(*event);
            let queue = window.queued_events();
            prop_assert!(count(&queue, WindowEventKind::Resized) <= 1);
            prop_assert!(count(&queue, WindowEventKind::SizeChanged) <= 1);
        }
    }

    #[test]
    fn latest_resize_wins(events in prop::collection::vec(event_strategy(), 0..64)) {
        let window = window();
        for event in &events {
            window.push_event(*event);
        }
        let queue = window.queued_events();
        let last_resized = events
            .iter()
            .rev()
            .find(|event| event.kind() == WindowEventKind::Resized)
            .copied();
        let pending = queue.iter().find_map(|event| match event {
            NativeEvent::Window(w @ WindowEvent::Resized(_)) => Some(*w),
            _ => None,
        });
        prop_assert_eq!(pending, last_resized);
    }

    #[test]
    fn other_events_keep_order(events in prop::collection::vec(event_strategy(), 0..64)) {
        let window = window();
        for event in &events {
            window.push_event(*event);
        }
        let expected: Vec<_> = events
            .iter()
            .filter(|event| !event.kind().is_coalesced())
            .copied()
            .map(NativeEvent::Window)
            .collect();
        let actual: Vec<_> = window
            .queued_events()
            .into_iter()
            .filter(|event| !event.window_kind().is_some_and(WindowEventKind::is_coalesced))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn pumping_drains(events in prop::collection::vec(event_strategy(), 0..64)) {
        let window = window();
        for event in &events {
            window.push_event(*event);
        }
        let queued = window.queued_len();
        prop_assert_eq!(window.pump_events(), queued);
        prop_assert!(!window.events_queued());
        prop_assert!(!window.processing_event());
        prop_assert!(!window.has_current_event());
    }
}
