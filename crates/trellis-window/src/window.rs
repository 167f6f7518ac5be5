#![forbid(unsafe_code)]

//! Native window event queue and dispatcher.
//!
//! A [`NativeWindow`] sits between the platform and the toolkit. The
//! platform pushes [`NativeEvent`]s as they arrive; the toolkit pumps them
//! one at a time and each is routed to the matching [`SurfaceWindow`]
//! notification.
//!
//! # Queue rules
//!
//! - FIFO, except that a new `Resized` or `SizeChanged` first drops any
//!   queued event of the same kind. At most one of each is ever pending.
//! - Handling a `Resizing` event drops every queued `Resized` and
//!   `SizeChanged`: the interactive resize supersedes them.
//! - While the pointer is over the non-client area, [`NativeWindow::tick`]
//!   synthesizes a `NonClientLeave` if the pointer has left the window
//!   without the platform saying so.
//!
//! # Re-entrancy
//!
//! Callbacks may push and pump on the same window through
//! [`EventContext::window`]. No interior borrow is held while a callback
//! runs. A callback may also destroy the window; dispatch stops touching
//! window state as soon as it notices.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace, warn};
use trellis_core::event::{
    KeyboardEvent, MouseEvent, MouseEventKind, NativeEvent, WindowEvent, WindowEventKind,
};
use trellis_core::Rect;

use crate::config::NativeWindowConfig;
use crate::error::{Result, WindowError};
use crate::liveness::{Liveness, ProcessingGuard};
use crate::surface::{EventContext, KeyboardGrabber, PlatformWindow, SurfaceWindow, WidgetPart};

/// Event filter hook. Returning `false` stops dispatch of the event.
pub type EventFilter = dyn Fn(&NativeEvent) -> bool;

pub struct NativeWindow {
    config: NativeWindowConfig,
    surface: Rc<dyn SurfaceWindow>,
    platform: Rc<dyn PlatformWindow>,
    queue: RefCell<VecDeque<NativeEvent>>,
    /// Events being dispatched, innermost last.
    current: RefCell<Vec<NativeEvent>>,
    depth: Cell<u32>,
    non_client_entered: Cell<bool>,
    title_text: RefCell<String>,
    filter: RefCell<Option<Rc<EventFilter>>>,
    grabber: RefCell<Option<Rc<dyn KeyboardGrabber>>>,
    last_poll: Cell<Option<Instant>>,
    liveness: Liveness,
}

impl NativeWindow {
    pub fn new(surface: Rc<dyn SurfaceWindow>, platform: Rc<dyn PlatformWindow>) -> Self {
        Self::with_config(NativeWindowConfig::default(), surface, platform)
    }

    pub fn with_config(
        config: NativeWindowConfig,
        surface: Rc<dyn SurfaceWindow>,
        platform: Rc<dyn PlatformWindow>,
    ) -> Self {
        Self {
            config,
            surface,
            platform,
            queue: RefCell::new(VecDeque::new()),
            current: RefCell::new(Vec::new()),
            depth: Cell::new(0),
            non_client_entered: Cell::new(false),
            title_text: RefCell::new(String::new()),
            filter: RefCell::new(None),
            grabber: RefCell::new(None),
            last_poll: Cell::new(None),
            liveness: Liveness::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &NativeWindowConfig {
        &self.config
    }

    /// A token that reports whether this window has been destroyed.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    pub fn events_queued(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Snapshot of the pending events, head first.
    pub fn queued_events(&self) -> Vec<NativeEvent> {
        self.queue.borrow().iter().cloned().collect()
    }

    /// True while any pump or dispatch is on the stack.
    pub fn processing_event(&self) -> bool {
        self.depth.get() != 0
    }

    pub fn processing_depth(&self) -> u32 {
        self.depth.get()
    }

    /// True between a `NonClientEnter` and the next leave or client enter.
    pub fn non_client_entered(&self) -> bool {
        self.non_client_entered.get()
    }

    pub fn title_text(&self) -> String {
        self.title_text.borrow().clone()
    }

    /// Set the title and queue a `TitleTextChanged` if it differs.
    pub fn set_title_text(&self, title: impl Into<String>) {
        let title = title.into();
        if *self.title_text.borrow() == title {
            return;
        }
        *self.title_text.borrow_mut() = title;
        self.push_event(WindowEvent::TitleTextChanged);
    }

    /// Install a filter run before every dispatch.
    pub fn set_filter(&self, filter: impl Fn(&NativeEvent) -> bool + 'static) {
        *self.filter.borrow_mut() = Some(Rc::new(filter));
    }

    pub fn clear_filter(&self) {
        *self.filter.borrow_mut() = None;
    }

    pub fn set_grabber(&self, grabber: Option<Rc<dyn KeyboardGrabber>>) {
        *self.grabber.borrow_mut() = grabber;
    }

    /// Queue an event. Events pushed to a destroyed window are dropped.
    pub fn push_event(&self, event: impl Into<NativeEvent>) {
        let event = event.into();
        if !self.is_alive() {
            warn!(
                category = event.category(),
                "event pushed to destroyed window"
            );
            return;
        }
        let mut queue = self.queue.borrow_mut();
        if self.config.coalesce_resize_events {
            if let Some(kind) = event.window_kind().filter(|kind| kind.is_coalesced()) {
                let before = queue.len();
                queue.retain(|queued| !queued.is_window(kind));
                let dropped = before - queue.len();
                if dropped > 0 {
                    trace!(?kind, dropped, "coalesced queued resize event");
                }
            }
        }
        queue.push_back(event);
        trace!(queued = queue.len(), "event queued");
    }

    /// Dispatch the event at the head of the queue.
    ///
    /// Returns `false` if the queue was empty.
    pub fn pump_event(&self) -> bool {
        let _guard = ProcessingGuard::enter(&self.depth, &self.liveness);
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Pump until the queue is empty or the window is destroyed.
    pub fn pump_events(&self) -> usize {
        let mut pumped = 0;
        while self.is_alive() && self.pump_event() {
            pumped += 1;
        }
        pumped
    }

    /// Dispatch `event` immediately, bypassing the queue.
    pub fn handle_event(&self, event: NativeEvent) {
        let liveness = self.liveness();
        if !liveness.is_alive() {
            warn!(
                category = event.category(),
                "event handled on destroyed window"
            );
            return;
        }
        let _guard = ProcessingGuard::enter(&self.depth, &liveness);
        self.current.borrow_mut().push(event.clone());
        self.dispatch(&event);
        if liveness.is_alive() {
            self.current.borrow_mut().pop();
        }
    }

    pub fn has_current_event(&self) -> bool {
        !self.current.borrow().is_empty()
    }

    /// The innermost event being dispatched.
    pub fn current_event(&self) -> Result<NativeEvent> {
        self.current
            .borrow()
            .last()
            .cloned()
            .ok_or(WindowError::NoCurrentEvent)
    }

    /// Close the platform window and destroy this one.
    pub fn close(&self) {
        if !self.is_alive() {
            return;
        }
        self.platform.close();
        self.destroy();
    }

    /// Mark the window dead and drop everything queued.
    pub fn destroy(&self) {
        if !self.liveness.kill() {
            return;
        }
        let dropped = {
            let mut queue = self.queue.borrow_mut();
            let n = queue.len();
            queue.clear();
            n
        };
        self.current.borrow_mut().clear();
        self.depth.set(0);
        debug!(dropped, "native window destroyed");
    }

    /// Run [`poll_non_client`](Self::poll_non_client) if the configured
    /// interval has passed since the last poll.
    pub fn tick(&self, now: Instant) -> bool {
        let due = self.last_poll.get().is_none_or(|last| {
            now.saturating_duration_since(last) >= self.config.non_client_poll_interval
        });
        if !due {
            return false;
        }
        self.last_poll.set(Some(now));
        self.poll_non_client()
    }

    /// Queue a `NonClientLeave` if the pointer left the window while it was
    /// over the non-client area. Returns whether one was queued.
    pub fn poll_non_client(&self) -> bool {
        if !self.is_alive() || !self.non_client_entered.get() {
            return false;
        }
        let position = self.platform.mouse_position();
        if self.surface.native_window_hit_test(position) != WidgetPart::Nowhere {
            return false;
        }
        if self.non_client_leave_pending() {
            return false;
        }
        trace!(?position, "synthesizing non-client leave");
        self.push_event(WindowEvent::NonClientLeave);
        true
    }

    /// A leave is queued after the last queued enter.
    fn non_client_leave_pending(&self) -> bool {
        let queue = self.queue.borrow();
        let last = |kind| queue.iter().rposition(|event| event.is_window(kind));
        match (
            last(WindowEventKind::NonClientLeave),
            last(WindowEventKind::NonClientEnter),
        ) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(leave), Some(enter)) => leave > enter,
        }
    }

    fn erase_queued_resizes(&self) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|event| {
            !matches!(
                event.window_kind(),
                Some(WindowEventKind::Resized | WindowEventKind::SizeChanged)
            )
        });
        let dropped = before - queue.len();
        if dropped > 0 {
            trace!(dropped, "resizing superseded queued resize events");
        }
    }

    fn dispatch(&self, event: &NativeEvent) {
        let filter = self.filter.borrow().clone();
        if let Some(filter) = filter {
            if !filter(event) {
                trace!(category = event.category(), "event filtered");
                return;
            }
            if !self.is_alive() {
                return;
            }
        }
        let cx = EventContext::new(self, event);
        match event {
            NativeEvent::Window(window_event) => self.dispatch_window(&cx, window_event),
            NativeEvent::Mouse(mouse) => self.dispatch_mouse(&cx, mouse),
            NativeEvent::NonClientMouse(mouse) => self.dispatch_non_client_mouse(&cx, mouse),
            NativeEvent::Keyboard(keyboard) => self.dispatch_keyboard(&cx, keyboard),
        }
    }

    fn dispatch_window(&self, cx: &EventContext<'_>, event: &WindowEvent) {
        if !self.surface.window_event(cx, event) {
            trace!(kind = ?event.kind(), "window event rejected by surface");
            return;
        }
        if !self.is_alive() {
            return;
        }
        let surface = &self.surface;
        match *event {
            WindowEvent::Paint => {
                let size = self.platform.surface_size();
                self.platform.invalidate(Rect::from_size(size));
                self.platform.render();
            }
            WindowEvent::Close => self.close(),
            WindowEvent::Resizing(size) => {
                surface.resized(cx, size);
                if self.is_alive() {
                    self.erase_queued_resizes();
                }
            }
            WindowEvent::Resized(size) | WindowEvent::SizeChanged(size) => {
                surface.resized(cx, size);
            }
            WindowEvent::Enter(position) => {
                self.non_client_entered.set(false);
                surface.mouse_entered(cx, position);
            }
            WindowEvent::Leave => surface.mouse_left(cx),
            WindowEvent::NonClientEnter(position) => {
                self.non_client_entered.set(true);
                surface.mouse_entered(cx, position);
            }
            WindowEvent::NonClientLeave => {
                self.non_client_entered.set(false);
                surface.mouse_left(cx);
            }
            WindowEvent::FocusGained => surface.focus_gained(cx),
            WindowEvent::FocusLost => surface.focus_lost(cx),
            WindowEvent::TitleTextChanged => {
                let title = self.title_text();
                surface.title_text_changed(cx, &title);
            }
        }
    }

    fn dispatch_mouse(&self, cx: &EventContext<'_>, event: &MouseEvent) {
        let surface = &self.surface;
        let MouseEvent {
            kind,
            position,
            modifiers,
        } = *event;
        match kind {
            MouseEventKind::WheelScrolled { wheel, delta } => {
                surface.mouse_wheel_scrolled(cx, wheel, delta);
            }
            MouseEventKind::ButtonPressed(button) => {
                surface.mouse_button_pressed(cx, button, position, modifiers);
            }
            MouseEventKind::ButtonDoubleClicked(button) => {
                surface.mouse_button_double_clicked(cx, button, position, modifiers);
            }
            MouseEventKind::ButtonReleased(button) => {
                surface.mouse_button_released(cx, button, position);
            }
            MouseEventKind::Moved => surface.mouse_moved(cx, position),
        }
    }

    fn dispatch_non_client_mouse(&self, cx: &EventContext<'_>, event: &MouseEvent) {
        let surface = &self.surface;
        let MouseEvent {
            kind,
            position,
            modifiers,
        } = *event;
        match kind {
            MouseEventKind::WheelScrolled { wheel, delta } => {
                surface.non_client_mouse_wheel_scrolled(cx, wheel, delta);
            }
            MouseEventKind::ButtonPressed(button) => {
                surface.non_client_mouse_button_pressed(cx, button, position, modifiers);
            }
            MouseEventKind::ButtonDoubleClicked(button) => {
                surface.non_client_mouse_button_double_clicked(cx, button, position, modifiers);
            }
            MouseEventKind::ButtonReleased(button) => {
                surface.non_client_mouse_button_released(cx, button, position);
            }
            MouseEventKind::Moved => surface.non_client_mouse_moved(cx, position),
        }
    }

    fn dispatch_keyboard(&self, cx: &EventContext<'_>, event: &KeyboardEvent) {
        let grabber = self.grabber.borrow().clone();
        let surface = &self.surface;
        match event {
            KeyboardEvent::KeyPressed {
                scan_code,
                key_code,
                modifiers,
            } => {
                let grabbed = grabber
                    .is_some_and(|g| g.key_pressed(*scan_code, *key_code, *modifiers));
                if grabbed {
                    trace!(?key_code, "key press grabbed");
                } else if self.is_alive() {
                    surface.key_pressed(cx, *scan_code, *key_code, *modifiers);
                }
            }
            KeyboardEvent::KeyReleased {
                scan_code,
                key_code,
                modifiers,
            } => {
                let grabbed = grabber
                    .is_some_and(|g| g.key_released(*scan_code, *key_code, *modifiers));
                if grabbed {
                    trace!(?key_code, "key release grabbed");
                } else if self.is_alive() {
                    surface.key_released(cx, *scan_code, *key_code, *modifiers);
                }
            }
            KeyboardEvent::TextInput(text) => {
                let grabbed = grabber.is_some_and(|g| g.text_input(text));
                if !grabbed && self.is_alive() {
                    surface.text_input(cx, text);
                }
            }
            KeyboardEvent::SysTextInput(text) => {
                let grabbed = grabber.is_some_and(|g| g.sys_text_input(text));
                if !grabbed && self.is_alive() {
                    surface.sys_text_input(cx, text);
                }
            }
        }
    }
}

impl fmt::Debug for NativeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeWindow")
            .field("config", &self.config)
            .field("queued", &self.queue.borrow().len())
            .field("depth", &self.depth.get())
            .field("non_client_entered", &self.non_client_entered.get())
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tracing_test::traced_test;
    use trellis_core::{Point, Size};
    use trellis_core::event::{KeyCode, MouseButton};

    #[derive(Default)]
    struct Surface {
        log: RefCell<Vec<String>>,
        hit: Cell<Option<WidgetPart>>,
    }

    impl SurfaceWindow for Surface {
        fn native_window_hit_test(&self, _position: Point) -> WidgetPart {
            self.hit.get().unwrap_or(WidgetPart::Client)
        }
        fn resized(&self, _cx: &EventContext<'_>, size: Size) {
            self.log.borrow_mut().push(format!("resized {}x{}", size.width, size.height));
        }
        fn mouse_entered(&self, _cx: &EventContext<'_>, _position: Point) {
            self.log.borrow_mut().push("entered".into());
        }
        fn mouse_left(&self, _cx: &EventContext<'_>) {
            self.log.borrow_mut().push("left".into());
        }
        fn mouse_button_pressed(
            &self,
            _cx: &EventContext<'_>,
            _button: MouseButton,
            _position: Point,
            _modifiers: trellis_core::event::Modifiers,
        ) {
            self.log.borrow_mut().push("pressed".into());
        }
        fn key_pressed(
            &self,
            cx: &EventContext<'_>,
            _scan_code: trellis_core::event::ScanCode,
            _key_code: KeyCode,
            _modifiers: trellis_core::event::Modifiers,
        ) {
            let depth = cx.window().processing_depth();
            self.log.borrow_mut().push(format!("key depth {depth}"));
        }
    }

    #[derive(Default)]
    struct Platform {
        closed: Cell<bool>,
        renders: Cell<u32>,
    }

    impl PlatformWindow for Platform {
        fn surface_size(&self) -> Size {
            Size::new(80, 24)
        }
        fn invalidate(&self, _area: Rect) {}
        fn render(&self) {
            self.renders.set(self.renders.get() + 1);
        }
        fn close(&self) {
            self.closed.set(true);
        }
        fn mouse_position(&self) -> Point {
            Point::new(500, 500)
        }
    }

    fn window() -> (NativeWindow, Rc<Surface>, Rc<Platform>) {
        let surface = Rc::new(Surface::default());
        let platform = Rc::new(Platform::default());
        let window = NativeWindow::new(surface.clone(), platform.clone());
        (window, surface, platform)
    }

    #[test]
    fn pump_reports_empty_queue() {
        let (window, _, _) = window();
        assert!(!window.pump_event());
        assert!(!window.processing_event());
    }

    #[test]
    fn resized_events_coalesce() {
        let (window, surface, _) = window();
        window.push_event(WindowEvent::Resized(Size::new(1, 1)));
        window.push_event(WindowEvent::Paint);
        window.push_event(WindowEvent::Resized(Size::new(2, 2)));
        assert_eq!(window.queued_len(), 2);
        assert_eq!(window.pump_events(), 2);
        assert_eq!(*surface.log.borrow(), vec!["resized 2x2".to_owned()]);
    }

    #[test]
    fn coalescing_can_be_disabled() {
        let surface = Rc::new(Surface::default());
        let config = NativeWindowConfig::default().with_coalesce_resize_events(false);
        let window =
            NativeWindow::with_config(config, surface, Rc::new(Platform::default()));
        window.push_event(WindowEvent::SizeChanged(Size::new(1, 1)));
        window.push_event(WindowEvent::SizeChanged(Size::new(2, 2)));
        assert_eq!(window.queued_len(), 2);
    }

    #[test]
    fn paint_renders() {
        let (window, _, platform) = window();
        window.push_event(WindowEvent::Paint);
        window.pump_event();
        assert_eq!(platform.renders.get(), 1);
    }

    #[test]
    fn close_destroys() {
        let (window, _, platform) = window();
        window.push_event(WindowEvent::Close);
        window.push_event(WindowEvent::Paint);
        assert!(window.pump_event());
        assert!(platform.closed.get());
        assert!(!window.is_alive());
        assert!(!window.events_queued());
        assert!(!window.processing_event());
        assert_eq!(platform.renders.get(), 0);
    }

    #[test]
    fn depth_visible_inside_callbacks() {
        let (window, surface, _) = window();
        window.push_event(KeyboardEvent::pressed(KeyCode::Enter));
        window.pump_event();
        // pump + handle
        assert_eq!(*surface.log.borrow(), vec!["key depth 2".to_owned()]);
    }

    #[test]
    fn current_event_outside_dispatch() {
        let (window, _, _) = window();
        assert_eq!(window.current_event(), Err(WindowError::NoCurrentEvent));
        assert!(!window.has_current_event());
    }

    #[test]
    fn filter_rejects() {
        let (window, surface, _) = window();
        window.set_filter(|event| !matches!(event, NativeEvent::Mouse(_)));
        window.push_event(NativeEvent::Mouse(MouseEvent::new(
            MouseEventKind::ButtonPressed(MouseButton::Left),
            Point::ZERO,
        )));
        window.pump_event();
        assert!(surface.log.borrow().is_empty());
        window.clear_filter();
        window.push_event(NativeEvent::Mouse(MouseEvent::new(
            MouseEventKind::ButtonPressed(MouseButton::Left),
            Point::ZERO,
        )));
        window.pump_event();
        assert_eq!(*surface.log.borrow(), vec!["pressed".to_owned()]);
    }

    #[test]
    fn non_client_poll_respects_interval() {
        let (window, surface, _) = window();
        surface.hit.set(Some(WidgetPart::Nowhere));
        window.handle_event(WindowEvent::NonClientEnter(Point::new(1, 0)).into());
        assert!(window.non_client_entered());

        let start = Instant::now();
        assert!(window.tick(start));
        assert!(!window.tick(start + Duration::from_millis(3)));
        // a leave is already pending
        assert!(!window.tick(start + Duration::from_millis(20)));
        assert_eq!(window.queued_len(), 1);

        window.pump_event();
        assert!(!window.non_client_entered());
        assert!(!window.poll_non_client());
    }

    #[traced_test]
    #[test]
    fn push_after_destroy_is_logged() {
        let (window, _, _) = window();
        window.destroy();
        window.push_event(WindowEvent::Paint);
        assert!(!window.events_queued());
        assert!(logs_contain("event pushed to destroyed window"));
    }

    #[traced_test]
    #[test]
    fn coalescing_is_traced() {
        let (window, _, _) = window();
        window.push_event(WindowEvent::SizeChanged(Size::new(1, 1)));
        window.push_event(WindowEvent::SizeChanged(Size::new(1, 2)));
        assert!(logs_contain("coalesced queued resize event"));
    }

    #[traced_test]
    #[test]
    fn destroy_logs_dropped_count() {
        let (window, _, _) = window();
        window.push_event(WindowEvent::Paint);
        window.push_event(WindowEvent::FocusGained);
        window.destroy();
        assert!(logs_contain("native window destroyed"));
        assert!(logs_contain("dropped=2"));
    }
}
