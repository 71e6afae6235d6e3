//! HTTP transport layer.
//!
//! The only transport concern the gateway owns is body handling: recognizing
//! the two custom binary content-types, buffering the body whole, and
//! installing the decoded value where handlers expect a parsed body.

pub mod body;
