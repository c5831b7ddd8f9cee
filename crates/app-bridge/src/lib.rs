//! Presentation bridge for the resonator designer.
//!
//! The UI talks to [`App`] through JSON messages ([`UiToApp`] in,
//! [`AppToUi`] out). A scene is plain data that any renderer can draw.

pub mod app;
pub mod dispatch;
pub mod form;
pub mod messages;
pub mod viewer;

pub use app::{App, AppError};
pub use dispatch::{dispatch, dispatch_json};
pub use form::{visible_groups, Field, FieldSpec, FormSchema, FormState, ShapeGroups};
pub use messages::{AppToUi, AreaReadout, UiToApp};
pub use viewer::{build_scene, Camera, DisplayStyle, Placement, Scene, SceneItem, ViewerOptions};
