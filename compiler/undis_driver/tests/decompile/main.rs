//! End-to-end decompilation of hand-assembled code objects.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod asm;
mod properties;
mod scenarios;
