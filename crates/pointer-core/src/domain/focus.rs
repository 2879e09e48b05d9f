//! Focus resolution: connects pointer geometry to pointer focus.
//!
//! The [`FocusResolver`] is the only writer of [`PointerState::focus`].  It is
//! invoked after anything that can change the hit-test outcome (pointer
//! motion, surface add/remove/move/resize/restack) and returns the ordered list
//! of events that the change implies, each addressed to the session that owns
//! the affected surface.
//!
//! # Ordering
//!
//! For a single pointer move that crosses from one surface into another, the
//! events are always `leave(old)`, `enter(new)`, `motion(new)` in that order,
//! so no client ever sees motion on a surface it has not been entered on.
//!
//! # Idempotence
//!
//! [`FocusResolver::recompute`] only reports *changes*.  Calling it twice with
//! nothing changed in between returns an empty list the second time.

use tracing::{debug, warn};

use crate::domain::pointer::PointerState;
use crate::domain::surface::{SessionId, Surface, SurfaceId, SurfaceRegistry};
use crate::protocol::buttons::ButtonState;
use crate::protocol::messages::{PointerEvent, Routed};

/// Tracks what has been reported to the focused session so far.
#[derive(Debug, Default)]
pub struct FocusResolver {
    /// Local coordinates most recently sent to the focused surface.
    last_local: Option<(i32, i32)>,
    /// Session that received the last `enter`; the `leave` goes there even
    /// if the surface is already gone from the registry.
    focused_session: Option<SessionId>,
}

impl FocusResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluates focus against the registry.
    ///
    /// Emits `leave`/`enter` when the topmost surface under the pointer
    /// changed.  When focus is unchanged but the focused surface moved under
    /// a stationary pointer, emits a single `motion` with the new local
    /// coordinates.
    pub fn recompute(
        &mut self,
        pointer: &mut PointerState,
        registry: &SurfaceRegistry,
    ) -> Vec<Routed> {
        let mut out = Vec::new();
        self.recompute_into(pointer, registry, &mut out);
        out
    }

    /// Moves the pointer and reports the resulting focus change and motion.
    pub fn pointer_moved(
        &mut self,
        pointer: &mut PointerState,
        registry: &SurfaceRegistry,
        x: i32,
        y: i32,
    ) -> Vec<Routed> {
        pointer.set_position(x, y);

        let mut out = Vec::new();
        let focus_changed = self.recompute_into(pointer, registry, &mut out);

        // `enter` already carries the position, but a move into a surface is
        // still a move: follow it with motion, after the enter.
        if focus_changed {
            if let (Some(surface), Some((local_x, local_y))) =
                (self.focused_surface(pointer, registry), self.last_local)
            {
                out.push(Routed::new(
                    surface.session,
                    PointerEvent::Motion {
                        surface: surface.id,
                        local_x,
                        local_y,
                    },
                ));
            }
        }
        out
    }

    /// Records a button transition and routes it to the focused surface.
    ///
    /// With no focus the transition is still recorded in the pointer's button
    /// table, but no event is produced; it is not replayed later.
    pub fn button_changed(
        &mut self,
        pointer: &mut PointerState,
        registry: &SurfaceRegistry,
        code: u32,
        state: ButtonState,
    ) -> Vec<Routed> {
        let previous = pointer.set_button(code, state);

        match self.focused_surface(pointer, registry) {
            Some(surface) => {
                debug!(surface = %surface.id, code, %state, %previous, "routing button");
                vec![Routed::new(
                    surface.session,
                    PointerEvent::Button {
                        surface: surface.id,
                        code,
                        state,
                    },
                )]
            }
            None => {
                warn!(code, %state, "button change over background dropped");
                Vec::new()
            }
        }
    }

    /// Handles a surface that has just been taken out of the registry.
    ///
    /// If it held focus, its session gets a `leave` and focus is cleared
    /// before the registry is consulted again, so a surface that was beneath
    /// it can take focus in the same pass.
    pub fn surface_removed(
        &mut self,
        pointer: &mut PointerState,
        registry: &SurfaceRegistry,
        removed: &Surface,
    ) -> Vec<Routed> {
        let mut out = Vec::new();
        if pointer.focus() == Some(removed.id) {
            debug!(surface = %removed.id, "focused surface removed");
            out.push(Routed::new(
                removed.session,
                PointerEvent::Leave {
                    surface: removed.id,
                },
            ));
            pointer.set_focus(None);
            self.last_local = None;
            self.focused_session = None;
        }
        self.recompute_into(pointer, registry, &mut out);
        out
    }

    /// Returns the pointer position in the focused surface's coordinates.
    pub fn focus_local(
        &self,
        pointer: &PointerState,
        registry: &SurfaceRegistry,
    ) -> Option<(i32, i32)> {
        let surface = self.focused_surface(pointer, registry)?;
        let (x, y) = pointer.position();
        Some(surface.region.to_local(x, y))
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn focused_surface<'r>(
        &self,
        pointer: &PointerState,
        registry: &'r SurfaceRegistry,
    ) -> Option<&'r Surface> {
        pointer.focus().and_then(|id| registry.get(id))
    }

    /// Returns `true` if focus changed.
    fn recompute_into(
        &mut self,
        pointer: &mut PointerState,
        registry: &SurfaceRegistry,
        out: &mut Vec<Routed>,
    ) -> bool {
        let (x, y) = pointer.position();
        let hit = registry.topmost_containing(x, y);
        let old = pointer.focus();

        if hit == old {
            if let Some(surface) = hit.and_then(|id| registry.get(id)) {
                let local = surface.region.to_local(x, y);
                if self.last_local != Some(local) {
                    self.last_local = Some(local);
                    out.push(Routed::new(
                        surface.session,
                        PointerEvent::Motion {
                            surface: surface.id,
                            local_x: local.0,
                            local_y: local.1,
                        },
                    ));
                }
            }
            return false;
        }

        if let Some(old_id) = old {
            self.emit_leave(old_id, out);
        }

        pointer.set_focus(hit);
        self.last_local = None;
        self.focused_session = None;

        if let Some(surface) = hit.and_then(|id| registry.get(id)) {
            let (local_x, local_y) = surface.region.to_local(x, y);
            debug!(surface = %surface.id, local_x, local_y, "pointer focus entered");
            self.last_local = Some((local_x, local_y));
            self.focused_session = Some(surface.session);
            out.push(Routed::new(
                surface.session,
                PointerEvent::Enter {
                    surface: surface.id,
                    local_x,
                    local_y,
                },
            ));
        }
        true
    }

    fn emit_leave(&self, old_id: SurfaceId, out: &mut Vec<Routed>) {
        match self.focused_session {
            Some(session) => {
                debug!(%old_id, %session, "pointer focus left");
                out.push(Routed::new(session, PointerEvent::Leave { surface: old_id }));
            }
            // Focus and session are set together; only a pointer focused by
            // another resolver lands here.
            None => warn!(%old_id, "focus had no session to notify"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::surface::{Rect, SessionId, Stacking};
    use crate::protocol::buttons::BTN_LEFT;
    use uuid::Uuid;

    struct Fixture {
        registry: SurfaceRegistry,
        pointer: PointerState,
        resolver: FocusResolver,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: SurfaceRegistry::new(),
                pointer: PointerState::default(),
                resolver: FocusResolver::new(),
            }
        }

        fn add(&mut self, id: u32, x: i32, y: i32, w: i32, h: i32) -> SessionId {
            let session = Uuid::new_v4();
            self.registry
                .add(Surface::new(SurfaceId(id), session, Rect::new(x, y, w, h)))
                .unwrap();
            session
        }

        fn move_to(&mut self, x: i32, y: i32) -> Vec<Routed> {
            self.resolver
                .pointer_moved(&mut self.pointer, &self.registry, x, y)
        }

        fn recompute(&mut self) -> Vec<Routed> {
            self.resolver.recompute(&mut self.pointer, &self.registry)
        }
    }

    fn enter(session: SessionId, id: u32, local_x: i32, local_y: i32) -> Routed {
        Routed::new(
            session,
            PointerEvent::Enter { surface: SurfaceId(id), local_x, local_y },
        )
    }

    fn leave(session: SessionId, id: u32) -> Routed {
        Routed::new(session, PointerEvent::Leave { surface: SurfaceId(id) })
    }

    fn motion(session: SessionId, id: u32, local_x: i32, local_y: i32) -> Routed {
        Routed::new(
            session,
            PointerEvent::Motion { surface: SurfaceId(id), local_x, local_y },
        )
    }

    // ── recompute ─────────────────────────────────────────────────────────────

    #[test]
    fn test_recompute_with_no_surfaces_keeps_focus_none() {
        let mut fx = Fixture::new();
        assert!(fx.recompute().is_empty());
        assert_eq!(fx.pointer.focus(), None);
    }

    #[test]
    fn test_recompute_gains_focus_when_surface_added_under_pointer() {
        // Arrange
        let mut fx = Fixture::new();
        fx.pointer.set_position(10, 10);
        let session = fx.add(1, 0, 0, 100, 100);

        // Act
        let events = fx.recompute();

        // Assert
        assert_eq!(events, vec![enter(session, 1, 10, 10)]);
        assert_eq!(fx.pointer.focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn test_recompute_twice_is_idempotent() {
        let mut fx = Fixture::new();
        fx.pointer.set_position(10, 10);
        fx.add(1, 0, 0, 100, 100);

        assert_eq!(fx.recompute().len(), 1);
        assert!(fx.recompute().is_empty());
    }

    #[test]
    fn test_recompute_reports_motion_when_focused_surface_moves_under_pointer() {
        // Arrange
        let mut fx = Fixture::new();
        let session = fx.add(1, 0, 0, 100, 100);
        fx.move_to(50, 50);

        // Act
        fx.registry.move_resize(SurfaceId(1), 10, 20, 100, 100).unwrap();
        let events = fx.recompute();

        // Assert
        assert_eq!(events, vec![motion(session, 1, 40, 30)]);
        assert!(fx.recompute().is_empty());
    }

    #[test]
    fn test_recompute_leaves_when_focused_surface_moves_away() {
        // Arrange
        let mut fx = Fixture::new();
        let session = fx.add(1, 0, 0, 100, 100);
        fx.move_to(50, 50);

        // Act
        fx.registry.move_resize(SurfaceId(1), 500, 500, 100, 100).unwrap();
        let events = fx.recompute();

        // Assert
        assert_eq!(events, vec![leave(session, 1)]);
        assert_eq!(fx.pointer.focus(), None);
    }

    #[test]
    fn test_recompute_switches_focus_when_surface_raised() {
        // Arrange
        let mut fx = Fixture::new();
        let lower = fx.add(1, 0, 0, 100, 100);
        let upper = fx.add(2, 0, 0, 100, 100);
        fx.move_to(5, 5);

        // Act
        fx.registry.raise(SurfaceId(1)).unwrap();
        let events = fx.recompute();

        // Assert
        assert_eq!(events, vec![leave(upper, 2), enter(lower, 1, 5, 5)]);
    }

    // ── pointer_moved ─────────────────────────────────────────────────────────

    #[test]
    fn test_move_into_surface_emits_enter_then_motion() {
        let mut fx = Fixture::new();
        let session = fx.add(1, 46, 76, 111, 134);

        let events = fx.move_to(46, 76);

        assert_eq!(events, vec![enter(session, 1, 0, 0), motion(session, 1, 0, 0)]);
    }

    #[test]
    fn test_move_within_surface_emits_only_motion() {
        let mut fx = Fixture::new();
        let session = fx.add(1, 0, 0, 100, 100);
        fx.move_to(10, 10);

        let events = fx.move_to(20, 30);

        assert_eq!(events, vec![motion(session, 1, 20, 30)]);
    }

    #[test]
    fn test_move_to_same_position_emits_nothing() {
        let mut fx = Fixture::new();
        fx.add(1, 0, 0, 100, 100);
        fx.move_to(10, 10);

        assert!(fx.move_to(10, 10).is_empty());
    }

    #[test]
    fn test_move_across_overlapping_surfaces_orders_leave_enter_motion() {
        // Arrange: surface 2 overlaps the right half of surface 1
        let mut fx = Fixture::new();
        let first = fx.add(1, 0, 0, 100, 100);
        let second = fx.add(2, 50, 0, 100, 100);
        fx.move_to(10, 10);

        // Act
        let events = fx.move_to(60, 10);

        // Assert
        assert_eq!(
            events,
            vec![leave(first, 1), enter(second, 2, 10, 10), motion(second, 2, 10, 10)]
        );
    }

    #[test]
    fn test_move_off_surface_emits_leave_only() {
        let mut fx = Fixture::new();
        let session = fx.add(1, 46, 76, 111, 134);
        fx.move_to(46, 76);

        let events = fx.move_to(45, 75);

        assert_eq!(events, vec![leave(session, 1)]);
        assert_eq!(fx.pointer.focus(), None);
    }

    #[test]
    fn test_move_over_background_emits_nothing() {
        let mut fx = Fixture::new();
        fx.add(1, 100, 100, 10, 10);
        assert!(fx.move_to(0, 0).is_empty());
        assert!(fx.move_to(1, 1).is_empty());
    }

    #[test]
    fn test_focus_follows_hit_test_over_a_grid() {
        let mut fx = Fixture::new();
        fx.add(1, 0, 0, 60, 60);
        fx.add(2, 40, 40, 60, 60);
        fx.registry
            .add_with_stacking(
                Surface::new(SurfaceId(3), Uuid::new_v4(), Rect::new(20, 20, 20, 80)),
                Stacking::Rank(-5),
            )
            .unwrap();

        for y in (-5..110).step_by(7) {
            for x in (-5..110).step_by(7) {
                fx.move_to(x, y);
                assert_eq!(
                    fx.pointer.focus(),
                    fx.registry.topmost_containing(x, y),
                    "focus mismatch at ({x}, {y})"
                );
            }
        }
    }

    // ── button_changed ────────────────────────────────────────────────────────

    #[test]
    fn test_button_routed_to_focused_surface() {
        // Arrange
        let mut fx = Fixture::new();
        let session = fx.add(1, 100, 100, 100, 100);
        fx.move_to(150, 150);

        // Act
        let events = fx.resolver.button_changed(
            &mut fx.pointer,
            &fx.registry,
            BTN_LEFT,
            ButtonState::Pressed,
        );

        // Assert
        assert_eq!(
            events,
            vec![Routed::new(
                session,
                PointerEvent::Button {
                    surface: SurfaceId(1),
                    code: BTN_LEFT,
                    state: ButtonState::Pressed,
                },
            )]
        );
    }

    #[test]
    fn test_button_over_background_is_dropped_but_recorded() {
        let mut fx = Fixture::new();
        fx.add(1, 100, 100, 100, 100);

        let events = fx.resolver.button_changed(
            &mut fx.pointer,
            &fx.registry,
            BTN_LEFT,
            ButtonState::Pressed,
        );

        assert!(events.is_empty());
        assert_eq!(fx.pointer.button_state(BTN_LEFT), ButtonState::Pressed);
    }

    #[test]
    fn test_button_dropped_on_background_is_not_replayed_on_enter() {
        let mut fx = Fixture::new();
        let session = fx.add(1, 100, 100, 100, 100);
        fx.resolver
            .button_changed(&mut fx.pointer, &fx.registry, BTN_LEFT, ButtonState::Pressed);

        let events = fx.move_to(150, 150);

        assert_eq!(events, vec![enter(session, 1, 50, 50), motion(session, 1, 50, 50)]);
    }

    // ── surface_removed ───────────────────────────────────────────────────────

    #[test]
    fn test_removing_focused_surface_emits_leave_to_its_session() {
        // Arrange
        let mut fx = Fixture::new();
        let session = fx.add(1, 0, 0, 100, 100);
        fx.move_to(10, 10);

        // Act
        let removed = fx.registry.remove(SurfaceId(1)).unwrap();
        let events = fx
            .resolver
            .surface_removed(&mut fx.pointer, &fx.registry, &removed);

        // Assert
        assert_eq!(events, vec![leave(session, 1)]);
        assert_eq!(fx.pointer.focus(), None);
    }

    #[test]
    fn test_removing_focused_surface_hands_focus_to_surface_beneath() {
        let mut fx = Fixture::new();
        let below = fx.add(1, 0, 0, 100, 100);
        let above = fx.add(2, 0, 0, 100, 100);
        fx.move_to(10, 20);

        let removed = fx.registry.remove(SurfaceId(2)).unwrap();
        let events = fx
            .resolver
            .surface_removed(&mut fx.pointer, &fx.registry, &removed);

        assert_eq!(events, vec![leave(above, 2), enter(below, 1, 10, 20)]);
        assert_eq!(fx.pointer.focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn test_removing_unfocused_surface_emits_nothing() {
        let mut fx = Fixture::new();
        fx.add(1, 0, 0, 100, 100);
        fx.add(2, 500, 500, 100, 100);
        fx.move_to(10, 10);

        let removed = fx.registry.remove(SurfaceId(2)).unwrap();
        let events = fx
            .resolver
            .surface_removed(&mut fx.pointer, &fx.registry, &removed);

        assert!(events.is_empty());
        assert_eq!(fx.pointer.focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn test_recompute_after_plain_remove_still_emits_leave() {
        // Arrange
        let mut fx = Fixture::new();
        let session = fx.add(1, 0, 0, 100, 100);
        fx.move_to(10, 10);

        // Act: remove without telling the resolver, then recompute
        fx.registry.remove(SurfaceId(1)).unwrap();
        let events = fx.recompute();

        // Assert
        assert_eq!(events, vec![leave(session, 1)]);
        assert_eq!(fx.pointer.focus(), None);
        assert!(fx.recompute().is_empty());
    }

    #[test]
    fn test_recompute_after_plain_remove_hands_focus_beneath() {
        let mut fx = Fixture::new();
        let below = fx.add(1, 0, 0, 100, 100);
        let above = fx.add(2, 0, 0, 100, 100);
        fx.move_to(10, 20);

        fx.registry.remove(SurfaceId(2)).unwrap();
        let events = fx.recompute();

        assert_eq!(events, vec![leave(above, 2), enter(below, 1, 10, 20)]);
    }

    // ── focus_local ───────────────────────────────────────────────────────────

    #[test]
    fn test_focus_local_is_none_without_focus() {
        let fx = Fixture::new();
        assert_eq!(fx.resolver.focus_local(&fx.pointer, &fx.registry), None);
    }

    #[test]
    fn test_focus_local_subtracts_surface_origin() {
        let mut fx = Fixture::new();
        fx.add(1, 100, 100, 100, 100);
        fx.move_to(150, 175);
        assert_eq!(
            fx.resolver.focus_local(&fx.pointer, &fx.registry),
            Some((50, 75))
        );
    }
}
