use gtk::gdk;
use gtk4 as gtk;

const CSS: &str = "
.circlet-overlay, .circlet-overlay .circlet-drawing-area {
    background: none;
    background-color: transparent;
}

.circlet-toast {
    background-color: rgba(32, 32, 32, 0.85);
    color: white;
    border-radius: 16px;
    padding: 8px 16px;
}

.circlet-error {
    color: @error_color;
}
";

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
