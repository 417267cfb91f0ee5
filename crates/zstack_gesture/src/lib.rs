//! ZStack Gestures
//!
//! Converts raw pointer input into navigation intent.
//!
//! # Features
//!
//! - **Pointer Tracker**: Rolling-window velocity estimation over raw
//!   pointer samples
//! - **Swipe-Back**: Edge-swipe state machine that scrubs a paused pop
//!   transition with the finger and commits or cancels on release
//!
//! The gesture owns no stack state: it only issues transition commands
//! through the motion engine and reports the outcome through a
//! caller-supplied capability interface.

pub mod pointer;
pub mod swipe_back;

pub use pointer::{PointerState, PointerTracker};
pub use swipe_back::{PointerButton, SwipeBackCallbacks, SwipeBackConfig, SwipeBackGesture};
