//! mailbook library - Core functionality for building an address book from mbox files

#![allow(clippy::multiple_crate_versions)] // Transitive dependencies

pub mod book;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod mbox;
pub mod normalize;
pub mod output;
pub mod processor;

pub use book::{AddressBook, AddressHistory, Direction, Observation, Variant};
pub use config::Config;
pub use error::{MailbookError, Result};
pub use processor::Processor;
