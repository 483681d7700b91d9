use circlet::config;
use circlet::gui::app::AppModel;
use circlet::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = match config::load_or_setup() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.circlet.Circlet");

    app.run::<AppModel>((config, rx));
}
