pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod keybindings;
pub mod theme;

pub use action::{Action, ActionCategory};
pub use app::{App, AppOptions};
pub use component::{Command, Component, Focusable, Handled, PageMove, RenderContext};
pub use keybindings::{KeyBinding, KeyBindings, KeyPattern};
pub use theme::Theme;
