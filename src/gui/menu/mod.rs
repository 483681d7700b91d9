pub mod geometry;
pub mod model;
pub mod view;

pub use geometry::{Activation, Bounds, Point, RingGeometry, Sector, Size};
pub use model::{ActivationListener, CircularMenu, InputEvent, MenuError, TitleStyle};
pub use view::Canvas;

pub const TOTAL_DEGREE: f64 = 360.0;
pub const START_DEGREE: f64 = -90.0; // sector 0 starts at the top
pub const BORDER_WIDTH: f64 = 2.0;
pub const TITLE_FONT: &str = "Sans";
