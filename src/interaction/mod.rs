//! Variable-rate pointer handling: drag sessions and the motion intent they produce.

pub mod drag;
pub mod intent;
pub mod pointer;

pub use drag::{DragSession, DragState, SelectedVertex};
pub use intent::{IntentOutcome, MotionIntent};
pub use pointer::{InteractionEvent, PointerSample};
