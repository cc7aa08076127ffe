//! audio-memo - record, play back and share short voice memos
//!
//! This crate provides a single-session audio recorder/player: capture a memo
//! from the microphone, play it back, and hand it to another application.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session state machine, value objects and errors
//! - **Application**: The session controller and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal/rodio device, share targets, config file)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
