use super::geometry::{Bounds, Point, Sector};
use super::model::{CircularMenu, MenuImages, TitleStyle};
use super::{BORDER_WIDTH, TITLE_FONT};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

const BORDER_COLOR: Srgba<f64> = Srgba::new(0.0, 0.0, 0.0, 1.0);

/// Drawing surface the menu renders into. Wedges are pie slices from the
/// bounds' center; angles are in degrees, 0 at screen right, clockwise.
pub trait Canvas {
    type Error;

    fn fill_wedge(
        &self,
        bounds: &Bounds,
        sector: &Sector,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;

    fn stroke_wedge(
        &self,
        bounds: &Bounds,
        sector: &Sector,
        color: Srgba<f64>,
        width: f64,
    ) -> Result<(), Self::Error>;

    fn fill_circle(
        &self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;

    /// Draws `image` with its top-left corner at `origin`.
    fn draw_image(&self, image: &Pixbuf, origin: Point) -> Result<(), Self::Error>;

    /// Draws `text` with its baseline starting at `origin`.
    fn draw_text(&self, text: &str, origin: Point, style: &TitleStyle) -> Result<(), Self::Error>;
}

struct MenuRenderer<'a> {
    menu: &'a CircularMenu,
    images: &'a MenuImages,
    bounds: Bounds,
}

impl<'a> MenuRenderer<'a> {
    fn center(&self) -> Point {
        self.bounds.center()
    }

    fn draw<C: Canvas>(&self, canvas: &C) -> Result<(), C::Error> {
        self.draw_wedges(canvas)?;
        self.draw_titles(canvas)?;
        self.draw_center(canvas)
    }

    fn draw_wedges<C: Canvas>(&self, canvas: &C) -> Result<(), C::Error> {
        let geometry = self.menu.geometry();
        let wedges = self.menu.colors().iter().zip(&self.images.items);

        for (i, (color, icon)) in wedges.take(geometry.item_count()).enumerate() {
            let sector = geometry.sector(i);
            canvas.fill_wedge(&self.bounds, &sector, *color)?;
            canvas.stroke_wedge(&self.bounds, &sector, BORDER_COLOR, BORDER_WIDTH)?;

            let anchor = self.center().offset(geometry.anchor_offset(i));
            canvas.draw_image(icon, centered(anchor, icon))?;
        }
        Ok(())
    }

    /// Titles sit below their icon and are centered on the icon's width, not the text's.
    fn draw_titles<C: Canvas>(&self, canvas: &C) -> Result<(), C::Error> {
        let geometry = self.menu.geometry();
        let style = self.menu.title_style();

        for (i, title) in self.menu.titles().iter().take(geometry.item_count()).enumerate() {
            let (w, h) = self
                .images
                .items
                .get(i)
                .map(|icon| (icon.width() as f64, icon.height() as f64))
                .unwrap_or_default();
            let anchor = self.center().offset(geometry.anchor_offset(i));
            let origin = Point::new(anchor.x - w / 2.0, anchor.y + h / 2.0 + style.padding);
            canvas.draw_text(title, origin, style)?;
        }
        Ok(())
    }

    fn draw_center<C: Canvas>(&self, canvas: &C) -> Result<(), C::Error> {
        let center = self.center();
        canvas.fill_circle(
            center,
            self.menu.geometry().inner_radius(),
            self.menu.center_color(),
        )?;
        canvas.draw_image(&self.images.center, centered(center, &self.images.center))
    }
}

fn centered(anchor: Point, image: &Pixbuf) -> Point {
    Point::new(
        anchor.x - image.width() as f64 / 2.0,
        anchor.y - image.height() as f64 / 2.0,
    )
}

pub fn draw<C: Canvas>(canvas: &C, menu: &CircularMenu, bounds: Bounds) -> Result<(), C::Error> {
    let Some(images) = menu.images() else {
        return Ok(());
    };
    MenuRenderer {
        menu,
        images,
        bounds,
    }
    .draw(canvas)
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn wedge_path(cr: &Context, bounds: &Bounds, sector: &Sector) {
    let center = bounds.center();
    cr.new_path();
    cr.move_to(center.x, center.y);
    cr.arc(
        center.x,
        center.y,
        bounds.radius(),
        sector.start.to_radians(),
        sector.end().to_radians(),
    );
    cr.close_path();
}

impl Canvas for Context {
    type Error = cairo::Error;

    fn fill_wedge(
        &self,
        bounds: &Bounds,
        sector: &Sector,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        set_color(self, color);
        wedge_path(self, bounds, sector);
        self.fill()
    }

    fn stroke_wedge(
        &self,
        bounds: &Bounds,
        sector: &Sector,
        color: Srgba<f64>,
        width: f64,
    ) -> Result<(), cairo::Error> {
        set_color(self, color);
        self.set_line_width(width);
        wedge_path(self, bounds, sector);
        self.stroke()
    }

    fn fill_circle(
        &self,
        center: Point,
        radius: f64,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        set_color(self, color);
        self.new_path();
        self.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.fill()
    }

    fn draw_image(&self, image: &Pixbuf, origin: Point) -> Result<(), cairo::Error> {
        self.save()?;
        self.set_source_pixbuf(image, origin.x, origin.y);
        self.paint()?;
        self.restore()
    }

    fn draw_text(&self, text: &str, origin: Point, style: &TitleStyle) -> Result<(), cairo::Error> {
        set_color(self, style.color);
        self.select_font_face(TITLE_FONT, cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        self.set_font_size(style.size);
        self.move_to(origin.x, origin.y);
        self.show_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::gui::menu::geometry::{RingGeometry, Size};
    use crate::gui::menu::model::tests::{MemoryLoader, menu_config};
    use crate::resources::ImageRef;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        FillWedge(f64, Srgba<f64>),
        StrokeWedge(f64),
        Circle(Point, f64),
        Image(Point, i32, i32),
        Text(String, Point),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: RefCell<Vec<Op>>,
    }

    impl RecordingCanvas {
        fn ops(&self) -> Vec<Op> {
            self.ops.borrow().clone()
        }

        fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
            self.ops.borrow().iter().filter(|op| pred(op)).count()
        }
    }

    impl Canvas for RecordingCanvas {
        type Error = std::convert::Infallible;

        fn fill_wedge(
            &self,
            _: &Bounds,
            sector: &Sector,
            color: Srgba<f64>,
        ) -> Result<(), Self::Error> {
            self.ops.borrow_mut().push(Op::FillWedge(sector.start, color));
            Ok(())
        }

        fn stroke_wedge(
            &self,
            _: &Bounds,
            sector: &Sector,
            color: Srgba<f64>,
            width: f64,
        ) -> Result<(), Self::Error> {
            assert_eq!(color, BORDER_COLOR);
            assert_eq!(width, BORDER_WIDTH);
            self.ops.borrow_mut().push(Op::StrokeWedge(sector.start));
            Ok(())
        }

        fn fill_circle(
            &self,
            center: Point,
            radius: f64,
            _: Srgba<f64>,
        ) -> Result<(), Self::Error> {
            self.ops.borrow_mut().push(Op::Circle(center, radius));
            Ok(())
        }

        fn draw_image(&self, image: &Pixbuf, origin: Point) -> Result<(), Self::Error> {
            self.ops
                .borrow_mut()
                .push(Op::Image(origin, image.width(), image.height()));
            Ok(())
        }

        fn draw_text(&self, text: &str, origin: Point, _: &TitleStyle) -> Result<(), Self::Error> {
            self.ops.borrow_mut().push(Op::Text(text.to_string(), origin));
            Ok(())
        }
    }

    const SIZE: Size = Size {
        width: 400.0,
        height: 400.0,
    };

    fn render(config: &crate::config::MenuConfig) -> RecordingCanvas {
        let mut menu = CircularMenu::new(config, &MemoryLoader).unwrap();
        let canvas = RecordingCanvas::default();
        menu.render(&canvas, SIZE).unwrap();
        canvas
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_draw_order() {
        let canvas = render(&menu_config(2));
        let ops = canvas.ops();

        assert!(matches!(ops[0], Op::FillWedge(start, _) if start == -90.0));
        assert!(matches!(ops[1], Op::StrokeWedge(start) if start == -90.0));
        assert!(matches!(ops[2], Op::Image(_, 24, 16)));
        assert!(matches!(ops[3], Op::FillWedge(start, _) if start == 90.0));
        assert!(matches!(ops[6], Op::Text(ref t, _) if t == "Item 0"));
        assert!(matches!(ops[7], Op::Text(ref t, _) if t == "Item 1"));
        assert_eq!(ops[8], Op::Circle(Point::new(200.0, 200.0), 40.0));
        assert_eq!(ops[9], Op::Image(Point::new(190.0, 190.0), 20, 20));
        assert_eq!(ops.len(), 10);
    }

    #[test]
    fn test_icon_and_title_placement() {
        let canvas = render(&menu_config(4));
        let ops = canvas.ops();
        let d = 80.0 * std::f64::consts::FRAC_1_SQRT_2;
        let anchor = Point::new(200.0 + d, 200.0 - d);

        // icon centered on the midpoint of sector 0 (up and to the right)
        let Op::Image(icon, w, h) = ops[2].clone() else {
            panic!("expected icon, got {:?}", ops[2]);
        };
        assert!(close(icon, Point::new(anchor.x - w as f64 / 2.0, anchor.y - h as f64 / 2.0)));

        // title below the icon, centered on the icon width, plus padding
        let Some(Op::Text(_, title)) = ops
            .iter()
            .find(|op| matches!(op, Op::Text(t, _) if t == "Item 0"))
            .cloned()
        else {
            panic!("missing title");
        };
        assert!(close(title, Point::new(anchor.x - 12.0, anchor.y + 8.0 + 4.0)));
    }

    #[test]
    fn test_short_arrays_are_clamped() {
        let mut config = menu_config(6);
        config.item_colors.truncate(3);
        config.item_icons.truncate(5);
        config.item_titles.truncate(2);

        let canvas = render(&config);
        assert_eq!(canvas.count(|op| matches!(op, Op::FillWedge(..))), 3);
        assert_eq!(canvas.count(|op| matches!(op, Op::StrokeWedge(..))), 3);
        assert_eq!(canvas.count(|op| matches!(op, Op::Text(..))), 2);
        // three wedge icons plus the center icon
        assert_eq!(canvas.count(|op| matches!(op, Op::Image(..))), 4);
    }

    #[test]
    fn test_extra_entries_beyond_item_count_are_ignored() {
        let mut config = menu_config(3);
        config.item_count = 2;

        let canvas = render(&config);
        assert_eq!(canvas.count(|op| matches!(op, Op::FillWedge(..))), 2);
        assert_eq!(canvas.count(|op| matches!(op, Op::Text(..))), 2);
    }

    #[test]
    fn test_title_without_icon_uses_zero_metrics() {
        let mut config = menu_config(2);
        config.item_icons.truncate(1);

        let canvas = render(&config);
        let geometry = RingGeometry::new(2, 40.0, 120.0).unwrap();
        let anchor = Point::new(200.0, 200.0).offset(geometry.anchor_offset(1));

        let Some(Op::Text(_, origin)) = canvas
            .ops()
            .into_iter()
            .find(|op| matches!(op, Op::Text(t, _) if t == "Item 1"))
        else {
            panic!("missing title");
        };
        assert!(close(origin, Point::new(anchor.x, anchor.y + 4.0)));
    }

    #[test]
    fn test_render_after_release_draws_nothing() {
        let mut menu = CircularMenu::new(&menu_config(4), &MemoryLoader).unwrap();
        menu.release();

        let canvas = RecordingCanvas::default();
        menu.render(&canvas, SIZE).unwrap();
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_cairo_render_fills_wedges() {
        let mut config = menu_config(4);
        config.item_colors[0] = Color::from(Srgba::new(1.0, 0.0, 0.0, 1.0));
        config.item_colors[2] = Color::from(Srgba::new(0.0, 0.0, 1.0, 1.0));
        config.center_icon = ImageRef::new("1x1");
        config.item_icons = vec![ImageRef::new("1x1"); 4];
        config.item_titles.clear();
        config.center_color = Color::from(Srgba::new(0.0, 1.0, 0.0, 1.0));

        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 400, 400).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            let mut menu = CircularMenu::new(&config, &MemoryLoader).unwrap();
            menu.render(&cr, SIZE).unwrap();
        }
        surface.flush();

        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        // ARGB32 pixels are native-endian premultiplied words
        let pixel = |x: usize, y: usize| {
            let i = y * stride + x * 4;
            u32::from_ne_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]])
        };

        assert_eq!(pixel(260, 140), 0xffff0000); // sector 0, top right
        assert_eq!(pixel(140, 260), 0xff0000ff); // sector 2, bottom left
        assert_eq!(pixel(200, 220), 0xff00ff00); // center disc
        assert_eq!(pixel(5, 5), 0); // outside the ring
    }
}
