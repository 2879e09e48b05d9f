//! Surface registry domain entity.
//!
//! The registry maintains every client surface in a single global coordinate
//! space together with its stacking (z) order.  It answers one question on the
//! hot path: "which surface is on top at this point?"
//!
//! # Stacking (for beginners)
//!
//! Surfaces may overlap.  When they do, the one drawn last ("on top") is the
//! one the user sees and therefore the one the pointer hits.  Each surface
//! carries an integer *rank*; a higher rank is closer to the viewer.  Two
//! surfaces may share a rank, so every add/raise/restack also stamps the
//! surface with a monotonically increasing *sequence number*.  The pair
//! `(rank, sequence)` is unique per surface, which makes the stacking order a
//! total order: among equal ranks the most recently stacked surface wins.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of the client session that owns a surface (UUID v4).
pub type SessionId = Uuid;

/// Opaque, stable identifier of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Errors returned by mutating registry operations.
///
/// Every failing operation leaves the registry exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The operation referenced a surface id that is not registered.
    #[error("surface not found: {0}")]
    NotFound(SurfaceId),

    /// A surface with this id is already registered.
    #[error("duplicate surface id: {0}")]
    DuplicateId(SurfaceId),

    /// Width or height was negative.
    #[error("invalid geometry {width}x{height}: width and height must be non-negative")]
    InvalidGeometry { width: i32, height: i32 },
}

/// A rectangle in global coordinates.
///
/// The covered area is half-open: `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner (may be negative).
    pub x: i32,
    /// Y coordinate of the top-left corner (may be negative).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the rightmost X coordinate (exclusive).
    ///
    /// Computed in `i64` so surfaces near `i32::MAX` do not overflow.
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Returns the bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Returns `true` if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns `true` if `(px, py)` lies inside the half-open rectangle.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && i64::from(px) < self.right()
            && i64::from(py) < self.bottom()
    }

    /// Translates a global point into this rectangle's local coordinate space.
    pub fn to_local(&self, px: i32, py: i32) -> (i32, i32) {
        (px.wrapping_sub(self.x), py.wrapping_sub(self.y))
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.width < 0 || self.height < 0 {
            return Err(RegistryError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// A client surface positioned in global space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Unique identifier of the surface.
    pub id: SurfaceId,
    /// The client session that receives this surface's pointer events.
    pub session: SessionId,
    /// Position and size in global space.
    pub region: Rect,
}

impl Surface {
    pub fn new(id: SurfaceId, session: SessionId, region: Rect) -> Self {
        Self { id, session, region }
    }
}

/// Where a newly added surface is placed in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stacking {
    /// Above every existing surface.
    #[default]
    Top,
    /// At an explicit rank.  Among equal ranks the newest surface is on top.
    Rank(i32),
}

#[derive(Debug, Clone)]
struct Entry {
    surface: Surface,
    z_order: i32,
    seq: u64,
}

impl Entry {
    fn stack_key(&self) -> (i32, u64) {
        (self.z_order, self.seq)
    }
}

/// The set of live surfaces and their stacking order.
///
/// Lookups are by [`SurfaceId`]; hit testing scans all surfaces once, which
/// is cheap for the handful of surfaces a desktop shows at a time.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Entry>,
    next_seq: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface above every existing surface.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the id is already registered,
    /// or [`RegistryError::InvalidGeometry`] if the size is negative.
    pub fn add(&mut self, surface: Surface) -> Result<(), RegistryError> {
        self.add_with_stacking(surface, Stacking::Top)
    }

    /// Adds a surface at the requested stacking position.
    ///
    /// # Errors
    ///
    /// Same as [`SurfaceRegistry::add`].
    pub fn add_with_stacking(
        &mut self,
        surface: Surface,
        stacking: Stacking,
    ) -> Result<(), RegistryError> {
        if self.surfaces.contains_key(&surface.id) {
            return Err(RegistryError::DuplicateId(surface.id));
        }
        surface.region.validate()?;

        let z_order = match stacking {
            Stacking::Top => self.top_rank(),
            Stacking::Rank(z) => z,
        };
        let seq = self.bump_seq();
        self.surfaces.insert(surface.id, Entry { surface, z_order, seq });
        Ok(())
    }

    /// Removes a surface and returns it.
    ///
    /// The returned value still carries the owning session, which the focus
    /// resolver needs to deliver a leave event after the surface is gone.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no surface has that id.
    pub fn remove(&mut self, id: SurfaceId) -> Result<Surface, RegistryError> {
        self.surfaces
            .remove(&id)
            .map(|entry| entry.surface)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Removes every surface owned by `session`, topmost first.
    pub fn remove_session(&mut self, session: SessionId) -> Vec<Surface> {
        let mut owned: Vec<Entry> = Vec::new();
        self.surfaces.retain(|_, entry| {
            if entry.surface.session == session {
                owned.push(entry.clone());
                false
            } else {
                true
            }
        });
        owned.sort_by_key(|entry| std::cmp::Reverse(entry.stack_key()));
        owned.into_iter().map(|entry| entry.surface).collect()
    }

    /// Updates the position and size of an existing surface in place.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no surface has that id, or
    /// [`RegistryError::InvalidGeometry`] if `width` or `height` is negative.
    pub fn move_resize(
        &mut self,
        id: SurfaceId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), RegistryError> {
        let entry = self
            .surfaces
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;
        let region = Rect::new(x, y, width, height);
        region.validate()?;
        entry.surface.region = region;
        Ok(())
    }

    /// Moves a surface above every other surface.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no surface has that id.
    pub fn raise(&mut self, id: SurfaceId) -> Result<(), RegistryError> {
        if !self.surfaces.contains_key(&id) {
            return Err(RegistryError::NotFound(id));
        }
        let z_order = self.top_rank();
        self.restack_entry(id, z_order);
        Ok(())
    }

    /// Assigns an explicit rank to a surface.  The surface becomes the
    /// topmost among surfaces sharing that rank.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no surface has that id.
    pub fn restack(&mut self, id: SurfaceId, z_order: i32) -> Result<(), RegistryError> {
        if !self.surfaces.contains_key(&id) {
            return Err(RegistryError::NotFound(id));
        }
        self.restack_entry(id, z_order);
        Ok(())
    }

    /// Returns the topmost surface whose region contains `(px, py)`.
    pub fn topmost_containing(&self, px: i32, py: i32) -> Option<SurfaceId> {
        self.surfaces
            .values()
            .filter(|entry| entry.surface.region.contains(px, py))
            .max_by_key(|entry| entry.stack_key())
            .map(|entry| entry.surface.id)
    }

    /// Returns the surface with the given id.
    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id).map(|entry| &entry.surface)
    }

    /// Returns the stacking rank of a surface.
    pub fn z_order(&self, id: SurfaceId) -> Option<i32> {
        self.surfaces.get(&id).map(|entry| entry.z_order)
    }

    /// Returns all surfaces ordered from topmost to bottommost.
    pub fn iter_top_down(&self) -> Vec<&Surface> {
        let mut entries: Vec<&Entry> = self.surfaces.values().collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.stack_key()));
        entries.into_iter().map(|entry| &entry.surface).collect()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn top_rank(&self) -> i32 {
        self.surfaces
            .values()
            .map(|entry| entry.z_order)
            .max()
            .unwrap_or(0)
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn restack_entry(&mut self, id: SurfaceId, z_order: i32) {
        let seq = self.bump_seq();
        if let Some(entry) = self.surfaces.get_mut(&id) {
            entry.z_order = z_order;
            entry.seq = seq;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
