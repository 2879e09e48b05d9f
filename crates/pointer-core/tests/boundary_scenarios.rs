//! Integration tests for pointer focus at surface boundaries.
//!
//! Each test places one surface, walks the pointer from just outside an edge
//! or corner, onto the first/last pixel, and back out again, checking after
//! every step that focus and local coordinates agree with the geometry.

use pointer_core::{
    ButtonState, FocusResolver, PointerEvent, PointerState, Rect, Routed, SessionId, Surface,
    SurfaceId, SurfaceRegistry, BTN_LEFT,
};
use uuid::Uuid;

const SURFACE: SurfaceId = SurfaceId(1);

struct Harness {
    registry: SurfaceRegistry,
    pointer: PointerState,
    resolver: FocusResolver,
    session: SessionId,
}

impl Harness {
    fn with_surface(x: i32, y: i32, width: i32, height: i32) -> Self {
        let session = Uuid::new_v4();
        let mut registry = SurfaceRegistry::new();
        registry
            .add(Surface::new(SURFACE, session, Rect::new(x, y, width, height)))
            .expect("surface must be added");
        let mut pointer = PointerState::default();
        let mut resolver = FocusResolver::new();
        resolver.recompute(&mut pointer, &registry);
        Self { registry, pointer, resolver, session }
    }

    fn region(&self) -> Rect {
        self.registry.get(SURFACE).expect("surface present").region
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> Vec<Routed> {
        let events = self
            .resolver
            .pointer_moved(&mut self.pointer, &self.registry, x, y);
        self.check_pointer(x, y);
        events
    }

    /// The global position is reported back, and focus plus local
    /// coordinates match whether the surface contains the point.
    fn check_pointer(&self, x: i32, y: i32) {
        assert_eq!(self.pointer.position(), (x, y));

        if self.region().contains(x, y) {
            assert_eq!(self.pointer.focus(), Some(SURFACE));
            let (sx, sy) = self
                .resolver
                .focus_local(&self.pointer, &self.registry)
                .expect("focused surface has local coordinates");
            assert_eq!(sx + self.region().x, x);
            assert_eq!(sy + self.region().y, y);
        } else {
            assert_eq!(self.pointer.focus(), None);
        }
    }

    /// Outside → inside → outside, where `inside` is `outside + step`.
    fn walk(&mut self, outside: (i32, i32), step: (i32, i32)) {
        let inside = (outside.0 + step.0, outside.1 + step.1);

        assert!(!self.region().contains(outside.0, outside.1));
        assert!(self.move_pointer(outside.0, outside.1).is_empty());

        assert!(self.region().contains(inside.0, inside.1));
        let entered = self.move_pointer(inside.0, inside.1);
        assert!(matches!(
            entered.first(),
            Some(Routed { event: PointerEvent::Enter { surface: SURFACE, .. }, .. })
        ));

        let left = self.move_pointer(outside.0, outside.1);
        assert_eq!(
            left,
            vec![Routed::new(self.session, PointerEvent::Leave { surface: SURFACE })]
        );
    }
}

#[test]
fn test_pointer_top_left() {
    let mut h = Harness::with_surface(46, 76, 111, 134);
    let r = h.region();
    h.walk((r.x - 1, r.y - 1), (1, 1));
}

#[test]
fn test_pointer_top_left_reports_zero_local_coordinates() {
    // Arrange
    let mut h = Harness::with_surface(46, 76, 111, 134);
    h.move_pointer(45, 75);

    // Act
    let events = h.move_pointer(46, 76);

    // Assert
    assert_eq!(
        events[0],
        Routed::new(
            h.session,
            PointerEvent::Enter { surface: SURFACE, local_x: 0, local_y: 0 }
        )
    );
    assert_eq!(h.pointer.focus(), Some(SURFACE));
}

#[test]
fn test_pointer_bottom_left() {
    let mut h = Harness::with_surface(99, 100, 100, 98);
    let r = h.region();
    h.walk((r.x - 1, r.y + r.height), (1, -1));
}

#[test]
fn test_pointer_top_right() {
    let mut h = Harness::with_surface(48, 100, 67, 100);
    let r = h.region();
    h.walk((r.x + r.width, r.y - 1), (-1, 1));
}

#[test]
fn test_pointer_bottom_right() {
    let mut h = Harness::with_surface(100, 123, 100, 69);
    let r = h.region();
    h.walk((r.x + r.width, r.y + r.height), (-1, -1));
}

#[test]
fn test_pointer_top_center() {
    let mut h = Harness::with_surface(100, 201, 100, 50);
    let r = h.region();
    h.walk((r.x + r.width / 2, r.y - 1), (0, 1));
}

#[test]
fn test_pointer_bottom_center() {
    let mut h = Harness::with_surface(100, 45, 67, 100);
    let r = h.region();
    h.walk((r.x + r.width / 2, r.y + r.height), (0, -1));
}

#[test]
fn test_pointer_left_center() {
    let mut h = Harness::with_surface(167, 45, 78, 100);
    let r = h.region();
    h.walk((r.x - 1, r.y + r.height / 2), (1, 0));
}

#[test]
fn test_pointer_right_center() {
    let mut h = Harness::with_surface(110, 37, 100, 46);
    let r = h.region();
    h.walk((r.x + r.width, r.y + r.height / 2), (-1, 0));
}

#[test]
fn test_pointer_surface_move() {
    // Arrange: pointer rests outside the surface
    let mut h = Harness::with_surface(100, 100, 100, 100);
    assert!(!h.region().contains(50, 50));
    h.move_pointer(50, 50);

    // Act: move the surface under the stationary pointer
    h.registry
        .move_resize(SURFACE, 0, 0, 100, 100)
        .expect("move must succeed");
    let events = h.resolver.recompute(&mut h.pointer, &h.registry);

    // Assert
    assert_eq!(
        events,
        vec![Routed::new(
            h.session,
            PointerEvent::Enter { surface: SURFACE, local_x: 50, local_y: 50 }
        )]
    );
    h.check_pointer(50, 50);
}

#[test]
fn test_moving_focused_surface_away_emits_exactly_one_leave() {
    let mut h = Harness::with_surface(0, 0, 100, 100);
    h.move_pointer(50, 50);

    h.registry
        .move_resize(SURFACE, 200, 200, 100, 100)
        .expect("move must succeed");
    let events = h.resolver.recompute(&mut h.pointer, &h.registry);

    assert_eq!(
        events,
        vec![Routed::new(h.session, PointerEvent::Leave { surface: SURFACE })]
    );
    assert_eq!(h.pointer.focus(), None);
    assert!(h.resolver.recompute(&mut h.pointer, &h.registry).is_empty());
}

#[test]
fn test_simple_pointer_button() {
    // Arrange
    let mut h = Harness::with_surface(100, 100, 100, 100);
    assert_eq!(h.pointer.button_state(BTN_LEFT), ButtonState::Released);

    // Act: move to the middle of the surface
    h.move_pointer(150, 150);

    // Assert: local coordinates
    assert_eq!(h.resolver.focus_local(&h.pointer, &h.registry), Some((50, 50)));

    // Act / Assert: press
    let pressed = h
        .resolver
        .button_changed(&mut h.pointer, &h.registry, BTN_LEFT, ButtonState::Pressed);
    assert_eq!(
        pressed,
        vec![Routed::new(
            h.session,
            PointerEvent::Button { surface: SURFACE, code: BTN_LEFT, state: ButtonState::Pressed }
        )]
    );

    // Act / Assert: release
    let released = h
        .resolver
        .button_changed(&mut h.pointer, &h.registry, BTN_LEFT, ButtonState::Released);
    assert_eq!(
        released,
        vec![Routed::new(
            h.session,
            PointerEvent::Button { surface: SURFACE, code: BTN_LEFT, state: ButtonState::Released }
        )]
    );
    assert_eq!(h.pointer.button_state(BTN_LEFT), ButtonState::Released);
}

#[test]
fn test_button_with_no_focus_produces_no_event() {
    let mut h = Harness::with_surface(100, 100, 100, 100);
    h.move_pointer(10, 10);

    let events = h
        .resolver
        .button_changed(&mut h.pointer, &h.registry, BTN_LEFT, ButtonState::Pressed);

    assert!(events.is_empty());
}
