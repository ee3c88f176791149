//! Adapts a shell's top panel color to the window maximized on the primary
//! display.
//!
//! The [`actor::panel_color::PanelColor`] actor owns all state. Hosts feed it
//! events through [`actor::channel`] and provide the collaborators declared in
//! [`sys::shell`].

pub mod actor;
pub mod common;
pub mod model;
pub mod sys;
