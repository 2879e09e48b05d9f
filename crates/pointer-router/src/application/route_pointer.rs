//! RoutePointerUseCase: keeps pointer focus in sync with surfaces and routes
//! pointer events to the owning client sessions.
//!
//! This use case is the heart of the router.  It owns one [`SurfaceRegistry`],
//! one [`PointerState`] and one [`FocusResolver`], accepts the inbound
//! triggers (pointer motion, buttons, surface lifecycle and geometry), and
//! dispatches the resulting events through the [`EventDispatcher`].
//!
//! # Serialization
//!
//! Every mutating method takes `&mut self`.  A trigger is processed to
//! completion (registry/pointer update, focus recomputation, delivery) before
//! the method returns, so the focus invariant holds between any two calls.  A
//! multi-threaded host has to put the use case behind one lock or one task;
//! the borrow checker rules out anything else.
//!
//! # Architecture
//!
//! The use case depends only on the [`EventSink`] trait and on `pointer-core`
//! domain types.  The sink is injected at construction time, which makes the
//! whole pipeline unit-testable without a transport.

use std::sync::Arc;

use pointer_core::{
    ButtonState, FocusResolver, InputEvent, PointerState, Rect, RegistryError, SessionId,
    Stacking, Surface, SurfaceId, SurfaceRegistry,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::application::dispatch::{DispatchReport, EventDispatcher, EventSink};

/// Error type for the route-pointer use case.
///
/// A rejected trigger leaves surfaces, pointer and focus exactly as they were.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("surface registry rejected the change: {0}")]
    Registry(#[from] RegistryError),
}

/// The Route Pointer use case.
pub struct RoutePointerUseCase {
    registry: SurfaceRegistry,
    pointer: PointerState,
    resolver: FocusResolver,
    dispatcher: EventDispatcher,
}

impl RoutePointerUseCase {
    /// Creates a router with no surfaces and the pointer at `(initial_x, initial_y)`.
    pub fn new(initial_x: i32, initial_y: i32, sink: Arc<dyn EventSink>) -> Self {
        Self {
            registry: SurfaceRegistry::new(),
            pointer: PointerState::new(initial_x, initial_y),
            resolver: FocusResolver::new(),
            dispatcher: EventDispatcher::new(sink),
        }
    }

    /// Handles one inbound trigger.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Registry`] if a surface operation referenced an
    /// unknown id, reused an existing id, or had negative size.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<DispatchReport, RouteError> {
        trace!(?event, "handling input event");
        match event {
            InputEvent::PointerMoved { x, y } => Ok(self.pointer_moved(x, y)),
            InputEvent::ButtonChanged { code, state } => Ok(self.button_changed(code, state)),
            InputEvent::SurfaceAdded {
                id,
                session,
                x,
                y,
                width,
                height,
                z_order,
            } => {
                let stacking = z_order.map(Stacking::Rank).unwrap_or_default();
                self.surface_added(
                    Surface::new(id, session, Rect::new(x, y, width, height)),
                    stacking,
                )
            }
            InputEvent::SurfaceRemoved { id } => self.surface_removed(id),
            InputEvent::SurfaceGeometryChanged {
                id,
                x,
                y,
                width,
                height,
            } => self.surface_geometry_changed(id, x, y, width, height),
            InputEvent::SurfaceRaised { id } => self.surface_raised(id),
            InputEvent::SessionClosed { session } => Ok(self.session_closed(session)),
        }
    }

    /// Moves the pointer to an absolute global position.
    pub fn pointer_moved(&mut self, x: i32, y: i32) -> DispatchReport {
        let routed = self
            .resolver
            .pointer_moved(&mut self.pointer, &self.registry, x, y);
        self.dispatcher.dispatch(routed)
    }

    /// Records a button transition and forwards it to the focused surface.
    pub fn button_changed(&mut self, code: u32, state: ButtonState) -> DispatchReport {
        let routed = self
            .resolver
            .button_changed(&mut self.pointer, &self.registry, code, state);
        self.dispatcher.dispatch(routed)
    }

    /// Registers a new surface.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateId`] or [`RegistryError::InvalidGeometry`].
    pub fn surface_added(
        &mut self,
        surface: Surface,
        stacking: Stacking,
    ) -> Result<DispatchReport, RouteError> {
        debug!(surface = %surface.id, session = %surface.session, region = ?surface.region, "surface added");
        self.registry.add_with_stacking(surface, stacking)?;
        Ok(self.recompute())
    }

    /// Unregisters a surface.  If it had focus its session receives `leave`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`].
    pub fn surface_removed(&mut self, id: SurfaceId) -> Result<DispatchReport, RouteError> {
        let removed = self.registry.remove(id)?;
        debug!(surface = %id, "surface removed");
        let routed = self
            .resolver
            .surface_removed(&mut self.pointer, &self.registry, &removed);
        Ok(self.dispatcher.dispatch(routed))
    }

    /// Moves and/or resizes a surface.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] or [`RegistryError::InvalidGeometry`].
    pub fn surface_geometry_changed(
        &mut self,
        id: SurfaceId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<DispatchReport, RouteError> {
        self.registry.move_resize(id, x, y, width, height)?;
        Ok(self.recompute())
    }

    /// Raises a surface to the top of the stack.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`].
    pub fn surface_raised(&mut self, id: SurfaceId) -> Result<DispatchReport, RouteError> {
        self.registry.raise(id)?;
        Ok(self.recompute())
    }

    /// Moves a surface to an explicit stacking rank.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`].
    pub fn surface_restacked(
        &mut self,
        id: SurfaceId,
        z_order: i32,
    ) -> Result<DispatchReport, RouteError> {
        self.registry.restack(id, z_order)?;
        Ok(self.recompute())
    }

    /// Removes every surface of a disconnected session.
    ///
    /// All of the session's surfaces are removed before focus is recomputed,
    /// so focus never passes through another surface of the same session on
    /// its way out.
    pub fn session_closed(&mut self, session: SessionId) -> DispatchReport {
        let removed = self.registry.remove_session(session);
        debug!(%session, surfaces = removed.len(), "session closed");

        let focus = self.pointer.focus();
        let focused = removed.iter().find(|surface| Some(surface.id) == focus);
        let routed = match focused {
            Some(surface) => {
                self.resolver
                    .surface_removed(&mut self.pointer, &self.registry, surface)
            }
            None => self.resolver.recompute(&mut self.pointer, &self.registry),
        };
        self.dispatcher.dispatch(routed)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Returns the surface that currently has pointer focus.
    pub fn current_focus(&self) -> Option<SurfaceId> {
        self.pointer.focus()
    }

    /// Returns the pointer position in global coordinates.
    pub fn current_position(&self) -> (i32, i32) {
        self.pointer.position()
    }

    /// Returns the state of a button; buttons never seen are released.
    pub fn button_state(&self, code: u32) -> ButtonState {
        self.pointer.button_state(code)
    }

    /// Returns the pointer position in the focused surface's coordinates.
    pub fn focus_local(&self) -> Option<(i32, i32)> {
        self.resolver.focus_local(&self.pointer, &self.registry)
    }

    /// Returns a registered surface.
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.registry.get(id)
    }

    /// Returns the number of registered surfaces.
    pub fn surface_count(&self) -> usize {
        self.registry.len()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn recompute(&mut self) -> DispatchReport {
        let routed = self.resolver.recompute(&mut self.pointer, &self.registry);
        self.dispatcher.dispatch(routed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
