//! Domain module: drum keys and the shared key-state machine.
//!
//! Pure logic with no I/O.  The key-state machine is the only state shared
//! between the touch and button pipelines.

pub mod drum;
pub mod key_state;

pub use drum::{DrumKey, KeyChange, KeyEdge, KeySnapshot};
pub use key_state::{InputSource, KeyStateMachine, SourceUpdate};
