#![doc(html_root_url = "https://docs.rs/lily-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A minimal declarative UI core.
//!
//! Build an element tree with [`h`] and [`component`], [`diff`] two trees into a [`Patch`],
//! and [`render`] it into any [`LiveTree`]: the browser DOM through [`web::DomTree`],
//! or the headless [`memory::MemoryTree`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod construct;
pub mod diff;
pub mod error;
pub mod live;
pub mod load;
pub mod memory;
pub mod node;
pub mod options;
pub mod reconcile;
pub mod render;
pub mod web;

pub use crate::{
	diff::diff,
	live::LiveTree,
	node::{component, h, Node, Patch},
	options::Options,
	reconcile::reconcile,
	render::{render, Renderer},
};

#[allow(clippy::non_ascii_literal)]
fn redact(text: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		text
	} else {
		"…"
	}
}
