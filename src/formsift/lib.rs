//! # Formsift Architecture
//!
//! Formsift filters a collection of items from the current values of a form.
//! Each form field names an item attribute, optionally followed by modifiers;
//! its value decides which items stay visible and which attribute content is
//! highlighted. It is a library that happens to ship a CLI, not the other way
//! around.
//!
//! ## Field names
//!
//! ```text
//! color=red blue        items whose color contains "red" or "blue"
//! color:exact=red       items whose color is exactly "red" (any case)
//! color:not=red         items whose color does not contain "red"
//! name:hilite=ada       highlight name attributes containing "ada"
//! ```
//!
//! All active fields must match (AND); the words of one field are alternatives
//! (OR). Attributes live on items as `data-<component>-<attribute>`, with the
//! component defaulting to `filter`.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, cli/)                               │
//! │  - Reads JSON items and forms, prints results               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filter host (filter.rs)                                    │
//! │  - Owns config, sources, style sink, listeners, debounce    │
//! │  - compute → dispatch `filtered` → commit                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query builder (field.rs, query.rs, escape.rs)              │
//! │  Match & highlight engine (engine.rs)                       │
//! │  - Pure functions over Rust types, no I/O                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//!
//! After every committed pass the visible candidates are exactly those that
//! satisfy the match query built from the form as it was at that pass.
//! Passes are idempotent and the style sink never holds more than one rule.
//!
//! ## Module Overview
//!
//! - [`field`]: Field-name grammar and value word splitting
//! - [`query`]: Match and highlight query construction and rendering
//! - [`escape`]: CSS identifier escaping
//! - [`engine`]: Evaluation, visibility commit and highlight rules
//! - [`filter`]: The filter host facade
//! - [`source`]: Form and candidate source traits
//! - [`event`]: The cancelable `filtered` notification
//! - [`debounce`]: Trailing-edge debounce
//! - [`model`]: Items, containers and forms
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod escape;
pub mod event;
pub mod field;
pub mod filter;
pub mod model;
pub mod query;
pub mod source;
