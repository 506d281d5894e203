//! The page's behavioral components
//!
//! Each one owns a disjoint region of the page and never talks to the
//! others; the application root is the only thing that knows all six.

pub mod animation;
pub mod contact;
pub mod navigation;
pub mod projects;
pub mod theme;
pub mod ui;

pub use animation::{AnimationComponent, CounterAnimation};
pub use contact::{
    show_notification, ContactComponent, FormSubmitter, NoticeKind, SimulatedSubmitter,
    SubmitError,
};
pub use navigation::NavigationComponent;
pub use projects::ProjectsComponent;
pub use theme::ThemeComponent;
pub use ui::UiComponent;
