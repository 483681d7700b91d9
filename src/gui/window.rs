use crate::config::{Presentation, WindowConfig};
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};

pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("circlet"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
}

/// Must run before the window is first shown.
pub fn apply_presentation(window: &gtk::ApplicationWindow, config: &WindowConfig) {
    window.set_title(Some(&config.title));

    match config.presentation {
        Presentation::Overlay if gtk4_layer_shell::is_supported() => {
            init_layer_shell(window);
            window.set_decorated(false);
            window.add_css_class("circlet-overlay");
        }
        Presentation::Overlay => {
            log::warn!("Layer shell is not supported here, falling back to a normal window");
            window.set_default_size(config.width, config.height);
        }
        Presentation::Window => window.set_default_size(config.width, config.height),
    }
}
