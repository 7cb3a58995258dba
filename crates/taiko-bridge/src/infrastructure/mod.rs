//! Infrastructure layer for the bridge.
//!
//! Contains OS-facing adapters.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `taiko_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`input_emulation`** – Implementations of `KeyInjector`: `SendInput` on
//!   Windows, XTest on Linux, a log-only injector for monitor mode, and a
//!   recording injector for tests.
//!
//! - **`serial`** – Opens the touch panel and button board ports and adapts
//!   them into plain blocking byte streams.
//!
//! - **`storage`** – TOML configuration file loading.

pub mod input_emulation;
pub mod serial;
pub mod storage;
