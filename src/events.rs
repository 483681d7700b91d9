/// Messages sent from the background runtime to the GUI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
}
