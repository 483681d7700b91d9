use super::geometry::{Activation, Bounds, Point, RingGeometry, Sector, Size};
use super::view::{self, Canvas};
use crate::config::MenuConfig;
use crate::resources::{ResourceError, ResourceLoader};
use gdk_pixbuf::Pixbuf;
use palette::Srgba;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Item count must be positive, got {0}")]
    InvalidItemCount(i64),
    #[error("Radii must satisfy 0 <= inner < outer, got inner={inner} outer={outer}")]
    InvalidRadii { inner: f64, outer: f64 },
    #[error("Title size and padding must be non-negative, got size={size} padding={padding}")]
    InvalidTitleStyle { size: f64, padding: f64 },
    #[error("Icon size must be positive, got {0}")]
    InvalidIconSize(i32),
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Input delivered by the host. Only `Down` activates anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Down(Point),
    Motion(Point),
    Up(Point),
}

pub trait ActivationListener {
    fn on_item_activated(&mut self, activation: Activation);
}

impl<F: FnMut(Activation)> ActivationListener for F {
    fn on_item_activated(&mut self, activation: Activation) {
        self(activation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleStyle {
    pub color: Srgba<f64>,
    pub size: f64,
    pub padding: f64,
}

pub(crate) struct MenuImages {
    pub center: Pixbuf,
    pub items: Vec<Pixbuf>,
}

pub struct CircularMenu {
    geometry: RingGeometry,
    colors: Vec<Srgba<f64>>,
    titles: Vec<String>,
    title_style: TitleStyle,
    center_color: Srgba<f64>,
    images: Option<MenuImages>,
    bounds: Option<(Size, Bounds)>,
    listener: Option<Box<dyn ActivationListener>>,
}

impl CircularMenu {
    pub fn new(config: &MenuConfig, loader: &impl ResourceLoader) -> Result<Self, MenuError> {
        let geometry =
            RingGeometry::new(config.item_count, config.inner_radius, config.outer_radius)?;

        if config.title_size < 0.0 || config.title_padding < 0.0 {
            return Err(MenuError::InvalidTitleStyle {
                size: config.title_size,
                padding: config.title_padding,
            });
        }

        // gdk-pixbuf only scales to positive sizes
        if let Some(size) = config.icon_size
            && size <= 0
        {
            return Err(MenuError::InvalidIconSize(size));
        }

        let center = loader.load_image(&config.center_icon)?;
        let items = config
            .item_icons
            .iter()
            .map(|r| loader.load_image(r))
            .collect::<Result<Vec<_>, _>>()?;

        if config.item_icons.len() < geometry.item_count()
            || config.item_colors.len() < geometry.item_count()
            || config.item_titles.len() < geometry.item_count()
        {
            log::debug!(
                "Menu has {} items but {} icons, {} colors, {} titles; extra items are skipped",
                geometry.item_count(),
                config.item_icons.len(),
                config.item_colors.len(),
                config.item_titles.len()
            );
        }

        Ok(Self {
            geometry,
            colors: config.item_colors.iter().map(|c| **c).collect(),
            titles: config.item_titles.clone(),
            title_style: TitleStyle {
                color: *config.title_color,
                size: config.title_size,
                padding: config.title_padding,
            },
            center_color: *config.center_color,
            images: Some(MenuImages { center, items }),
            bounds: None,
            listener: None,
        })
    }

    pub fn geometry(&self) -> &RingGeometry {
        &self.geometry
    }

    pub fn item_count(&self) -> usize {
        self.geometry.item_count()
    }

    pub fn sweep(&self) -> f64 {
        self.geometry.sweep()
    }

    pub fn sector(&self, index: usize) -> Sector {
        self.geometry.sector(index)
    }

    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        self.geometry.sectors()
    }

    pub fn colors(&self) -> &[Srgba<f64>] {
        &self.colors
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn title_style(&self) -> &TitleStyle {
        &self.title_style
    }

    pub fn center_color(&self) -> Srgba<f64> {
        self.center_color
    }

    pub(crate) fn images(&self) -> Option<&MenuImages> {
        self.images.as_ref()
    }

    /// Replaces any previously registered listener.
    pub fn set_listener(&mut self, listener: impl ActivationListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Bounding box of the ring for a widget of `size`, cached until the size changes.
    pub fn bounds(&mut self, size: Size) -> Bounds {
        match self.bounds {
            Some((cached_size, bounds)) if cached_size == size => bounds,
            _ => {
                let bounds = self.geometry.bounds(size);
                self.bounds = Some((size, bounds));
                bounds
            }
        }
    }

    pub fn render<C: Canvas>(&mut self, canvas: &C, size: Size) -> Result<(), C::Error> {
        let bounds = self.bounds(size);
        view::draw(canvas, self, bounds)
    }

    /// Hit-tests a press against the ring and notifies the listener.
    pub fn handle_input(&mut self, size: Size, event: InputEvent) -> Option<Activation> {
        let InputEvent::Down(press) = event else {
            return None;
        };

        let center = self.bounds(size).center();
        let activation = self.geometry.locate(center, press)?;

        log::debug!("Press at ({:.1}, {:.1}) activated {}", press.x, press.y, activation);

        if let Some(listener) = self.listener.as_mut() {
            listener.on_item_activated(activation);
        }
        Some(activation)
    }

    /// Drops the decoded images. Returns `false` if they were already released.
    pub fn release(&mut self) -> bool {
        match self.images.take() {
            Some(images) => {
                log::debug!("Releasing {} menu images", images.items.len() + 1);
                true
            }
            None => false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.images.is_none()
    }
}

impl Drop for CircularMenu {
    fn drop(&mut self) {
        self.release();
    }
}
