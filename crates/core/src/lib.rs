//! Scroll-driven reveal triggers and the interactive widgets of the folio
//! portfolio page.
//!
//! Hosts supply two capabilities, an [`visibility::IntersectionObserver`]
//! and a [`schedule::Scheduler`], and forward scroll, timer and input events
//! into a [`page::Page`].

pub mod config;
pub mod page;
pub mod pointer;
pub mod schedule;
pub mod visibility;
pub mod widgets;

pub use config::{
    Certification, ConfigError, ContactChannel, Experience, FolioConfig, SectionSpec,
};
pub use page::{Page, PageError, PageSnapshot};
