//! Input interpretation and camera control for an infinite 2D canvas.
//!
//! Raw pointer, wheel, keyboard, and multi-touch events are turned into camera
//! gestures (pan, zoom, rotate) by two state machines, arbitrated by a camera
//! mux, and applied through a rig to a camera that keeps its position inside
//! optional boundaries and its zoom inside configured limits. The host only
//! wires its native events into [`engine::Engine`] and calls
//! [`engine::Engine::update`] once per frame.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing facade owning the whole input pipeline |
//! | [`orchestrator`] | Routes gesture outputs to observers, the mux, and the rig |
//! | [`kmt`] | Keyboard / mouse / trackpad gesture machine |
//! | [`touch`] | Two-finger touch gesture machine |
//! | [`fsm`] | Table-driven state machine driver shared by both machines |
//! | [`input`] | Host input types, machine events, gesture outputs, canvas seams |
//! | [`mux`] | Permission layer between recognized gestures and the camera |
//! | [`rig`] | Policy layer: clamping, restrictions, containment floor |
//! | [`camera`] | Camera model, animations, lock-on, change events |
//! | [`bounds`] | Boundaries, zoom and rotation limits, clamping helpers |
//! | [`coords`] | Window / canvas / viewport / world conversions |
//! | [`animation`] | Easing functions and tween progress |
//! | [`observer`] | Synchronous publish/subscribe with disposer handles |
//! | [`geometry`] | `Point` algebra and angle helpers |
//! | [`config`] | Input tuning, loadable from JSON or the environment |
//! | [`consts`] | Shared numeric constants |
//! | [`error`] | [`error::CameraError`] |

pub mod animation;
pub mod bounds;
pub mod camera;
pub mod config;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod input;
pub mod kmt;
pub mod mux;
pub mod observer;
pub mod orchestrator;
pub mod rig;
pub mod touch;
