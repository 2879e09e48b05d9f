//! Application layer use cases for the pointer router.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure focus and hit-testing rules) and the infrastructure (channels,
//! storage, event sources).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil one goal, e.g. "when a surface
//!   is removed, tell its session the pointer left and give focus to whatever
//!   is now underneath".
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the transport can be swapped without changing this code.
//! - **Contain no network I/O and no file system access**.
//!
//! # Sub-modules
//!
//! - **`route_pointer`** – Accepts pointer and surface triggers, keeps focus
//!   consistent, and produces the events each session must see.  It runs on
//!   every pointer motion.
//!
//! - **`dispatch`** – Stamps serials on routed events and hands them to the
//!   injected [`dispatch::EventSink`].

pub mod dispatch;
pub mod route_pointer;
