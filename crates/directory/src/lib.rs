//! Clubhouse Directory - the member directory data layer.
//!
//! This crate implements everything between the hosted backend and the
//! presentation layer of the Clubhouse app:
//!
//! - [`backend`] - REST client for the hosted account + document service
//! - [`services::session`] - session lifecycle and identity state machine
//! - [`services::directory`] - roster loading, search, and id lookup
//! - [`sources`] - document source contracts, including the bundled dataset
//! - [`preferences`] - volatile display-mode preference
//!
//! The presentation layer is a pure consumer: it reads the session state,
//! the roster, and the theme flag, and invokes `login`/`signup`/`logout`/
//! `toggle`. Construct one [`services::session::SessionManager`] and one
//! [`services::directory::DirectoryStore`] at process start and pass them
//! down explicitly; nothing in this crate is a global.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod models;
pub mod preferences;
pub mod services;
pub mod sources;
