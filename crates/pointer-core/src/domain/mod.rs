//! Domain entities for the pointer router.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, network libraries, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the rules are: which surface is on top at a point, what the pointer
//! is pressing, and which surface owns pointer focus.  The application layer
//! (in `pointer-router`) orchestrates these and delivers the resulting events.

/// Surfaces, their geometry, stacking and hit testing.
pub mod surface;

/// Global pointer position and button table.
pub mod pointer;

/// Focus transitions and local-coordinate mapping.
///
/// See [`focus::FocusResolver`] for the main type.
pub mod focus;
