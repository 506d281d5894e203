//! folio - the presentation layer of a personal portfolio page
//!
//! A [`dom::Page`] stands in for the browser document. Six components in
//! [`components`] attach behavior to it through the lifecycle contract in
//! [`component`], and [`app::Application`] starts them in a fixed order.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod component;
pub mod components;
pub mod config;
pub mod demo;
pub mod dom;
pub mod logging;
pub mod storage;
pub mod util;
