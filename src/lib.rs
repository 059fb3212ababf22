//! Client-side controller for an identity form (`fio`, `email`, `phone`).
//!
//! State lives in a [`store::Store`] driven by the form reducer; the
//! submission workflow validates the fields, sends them through an injected
//! [`transport::Transport`] and polls until the server reports a terminal
//! status.

pub mod api;
pub mod binding;
pub mod cancel;
pub mod config;
pub mod form;
pub mod logging;
pub mod mvi;
pub mod store;
pub mod transport;
