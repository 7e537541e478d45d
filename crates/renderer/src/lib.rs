//! Ready-made [`RenderSink`](deck_core::RenderSink) implementations.
//!
//! The core never draws.  These sinks cover the common hosts: a terminal
//! ([`TextSink`]), another process ([`JsonSink`]) and another task in the
//! same process ([`ChannelSink`]).

pub mod channel;
pub mod json;
pub mod text;

pub use channel::ChannelSink;
pub use json::JsonSink;
pub use text::{render_text, TextSink};
