//! # loopstrip-core
//!
//! Headless infinite-loop carousel engine.
//!
//! ## Overview
//!
//! A carousel of `N` slides is presented as a strip of `3N` slots (the
//! originals with a full clone run on each side). Navigation moves an index
//! through that strip with animated offsets; once a transition settles in a
//! clone run the engine jumps, without animation, to the identical slot in
//! the middle run. The user never sees a seam and the index always rests on
//! a true original.
//!
//! The engine is a synchronous state machine:
//!
//! - [`Event`]s in: navigation, keyboard, pointer drag, resize, visibility,
//!   reduced-motion, transition settle and timer firings.
//! - [`Command`]s out: track offset (animated or not), transition toggles,
//!   direction tag, timer arm/cancel and pointer capture.
//!
//! Autoplay advances on a repeating timer and backs off for a cooldown after
//! every user interaction; it never starts while reduced motion is requested
//! or the page is hidden.
//!
//! ## Modules
//!
//! - [`engine`]: the state machine
//! - [`mount`]: binding to a host container (inert when anchors are missing)
//! - [`strip`]: the clone-padded slide strip
//! - [`driver`]: tokio reference host
//! - [`sim`]: virtual-clock host for deterministic replays
//!
//! ## Example
//!
//! ```
//! use loopstrip_core::{
//!     Anchors, CarouselConfig, Environment, Event, Layout, NavCommand,
//!     mount,
//! };
//!
//! let anchors = Anchors::new(Layout::new(180.0, 20.0, 800.0), vec!["a", "b"]);
//! let (mut carousel, _init) =
//!     mount(Some(anchors), Environment::default(), CarouselConfig::default())
//!         .expect("two slides mount");
//!
//! carousel.handle(Event::Navigate(NavCommand::Next));
//! carousel.handle(Event::TransitionSettled);
//! assert_eq!(carousel.current_slide(), Some(&"b"));
//! ```

pub mod config;
pub mod constants;
pub mod driver;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod messages;
pub mod mount;
pub mod sim;
pub mod strip;
pub mod timers;

pub use config::{AdvanceMode, CarouselConfig};
pub use driver::{CarouselHandle, Snapshot, Surface};
pub use engine::{CarouselEngine, Environment};
pub use error::{ConfigError, DriverError};
pub use layout::{Layout, Metrics};
pub use messages::{
    Command, Direction, Event, Key, NavCommand, PointerInput, PointerKind,
    TimerId, TimerKind,
};
pub use mount::{Anchors, MountedCarousel, mount};
pub use sim::SimHost;
pub use strip::{Segment, Strip};
