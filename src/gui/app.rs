use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::menu::{Activation, CircularMenu, InputEvent, Point, Size};
use crate::gui::{theme, window};
use crate::resources::IconLoader;
use anyhow::Context as _;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub menu: Rc<RefCell<Option<CircularMenu>>>,
    pub config: Config,
    pub toast: Option<String>,
    pub toast_serial: u64,
    pub error: Option<String>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Press(Point),
    Activated(Activation),
    DismissToast(u64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

/// Builds the menu from `config` and wires its listener to the component.
pub fn build_menu(
    config: &Config,
    sender: &ComponentSender<AppModel>,
) -> anyhow::Result<CircularMenu> {
    let loader = IconLoader::new(config::get_config_dir(), config.menu.icon_size);
    let mut menu = CircularMenu::new(&config.menu, &loader)
        .context("Failed to build the circular menu")?;

    let sender = sender.clone();
    menu.set_listener(move |activation: Activation| {
        sender.input(AppMsg::Activated(activation));
    });
    Ok(menu)
}

fn toast_text(activation: Activation) -> String {
    format!("Item {} clicked", activation.index())
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            add_css_class: "circlet-window",

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "circlet-drawing-area",

                    add_controller = gtk::GestureClick {
                        set_button: gtk::gdk::BUTTON_PRIMARY,
                        connect_pressed[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Press(Point::new(x, y)));
                        }
                    }
                },

                add_overlay = &gtk::Label {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::End,
                    set_margin_bottom: 32,
                    add_css_class: "circlet-toast",
                    #[watch]
                    set_visible: model.toast.is_some(),
                    #[watch]
                    set_label: model.toast.as_deref().unwrap_or_default(),
                },

                add_overlay = &gtk::Label {
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Center,
                    set_wrap: true,
                    set_margin_start: 24,
                    set_margin_end: 24,
                    add_css_class: "circlet-error",
                    #[watch]
                    set_visible: model.error.is_some(),
                    #[watch]
                    set_label: model.error.as_deref().unwrap_or_default(),
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::apply_presentation(&root, &config.window);

        let (menu, error) = match build_menu(&config, &sender) {
            Ok(menu) => (Some(menu), None),
            Err(e) => {
                log::error!("{:#}", e);
                (None, Some(format!("{:#}", e)))
            }
        };

        let model = AppModel {
            menu: Rc::new(RefCell::new(menu)),
            config,
            toast: None,
            toast_serial: 0,
            error,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let menu_draw = model.menu.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                let size = Size::new(width as f64, height as f64);
                if let Some(menu) = menu_draw.borrow_mut().as_mut()
                    && let Err(e) = menu.render(cr, size)
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        // the drawing area is torn down with its window
        let menu_detach = model.menu.clone();
        widgets.drawing_area.connect_unrealize(move |_| {
            if let Some(menu) = menu_detach.borrow_mut().as_mut()
                && menu.release()
            {
                log::info!("Menu detached, images released");
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Press(point) => {
                let size = Size::new(
                    self.drawing_area.width() as f64,
                    self.drawing_area.height() as f64,
                );
                if let Some(menu) = self.menu.borrow_mut().as_mut() {
                    menu.handle_input(size, InputEvent::Down(point));
                }
            }
            AppMsg::Activated(activation) => {
                let text = toast_text(activation);
                log::info!("{}", text);
                self.toast = Some(text);
                self.toast_serial += 1;

                let serial = self.toast_serial;
                let timeout = Duration::from_millis(self.config.window.toast_timeout_ms);
                glib::timeout_add_local_once(timeout, move || {
                    sender.input(AppMsg::DismissToast(serial));
                });
            }
            AppMsg::DismissToast(serial) => {
                // a newer toast owns its own timer
                if serial == self.toast_serial {
                    self.toast = None;
                }
            }
            AppMsg::ConfigReload => self.reload(&sender),
        }
    }
}

impl AppModel {
    fn reload(&mut self, sender: &ComponentSender<Self>) {
        let config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };

        match build_menu(&config, sender) {
            Ok(menu) => {
                if let Some(mut old) = self.menu.replace(Some(menu)) {
                    old.release();
                }
                self.config = config;
                self.error = None;
                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Keeping the previous menu: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_text() {
        assert_eq!(toast_text(Activation::Center), "Item -1 clicked");
        assert_eq!(toast_text(Activation::Item(3)), "Item 3 clicked");
    }

    #[test]
    fn test_app_event_maps_to_reload() {
        assert!(matches!(
            AppMsg::from(AppEvent::ConfigReload),
            AppMsg::ConfigReload
        ));
    }
}
