pub mod directory_loader;
pub mod zip_loader;

use log::{info, warn};

use crate::gtfs::TableKind;

// LoadEventHandler is notified as a loader works through a feed.
// Every method defaults to doing nothing.
pub trait LoadEventHandler {
    fn on_table_opened(&self, _kind: TableKind, _file_name: &str) {}
    fn on_table_loaded(&self, _kind: TableKind, _keys: usize) {}
    fn on_unrecognized_file(&self, _file_name: &str) {}
}

// LogEventHandler reports loading progress through the log crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventHandler;

impl LoadEventHandler for LogEventHandler {
    fn on_table_opened(&self, kind: TableKind, file_name: &str) {
        info!("Loading table {} from {}", kind, file_name);
    }

    fn on_table_loaded(&self, kind: TableKind, keys: usize) {
        info!("Loaded table {}: {} keys", kind, keys);
    }

    fn on_unrecognized_file(&self, file_name: &str) {
        warn!("Unrecognized file in GTFS feed: {}", file_name);
    }
}

// FnLoadEventHandler forwards each event to a closure.
pub struct FnLoadEventHandler {
    pub on_table_opened: Box<dyn Fn(TableKind, &str)>,
    pub on_table_loaded: Box<dyn Fn(TableKind, usize)>,
    pub on_unrecognized_file: Box<dyn Fn(&str)>,
}

impl Default for FnLoadEventHandler {
    fn default() -> Self {
        FnLoadEventHandler {
            on_table_opened: Box::new(|_: TableKind, _: &str| ()),
            on_table_loaded: Box::new(|_: TableKind, _: usize| ()),
            on_unrecognized_file: Box::new(|_: &str| ()),
        }
    }
}

impl LoadEventHandler for FnLoadEventHandler {
    fn on_table_opened(&self, kind: TableKind, file_name: &str) {
        (self.on_table_opened)(kind, file_name);
    }

    fn on_table_loaded(&self, kind: TableKind, keys: usize) {
        (self.on_table_loaded)(kind, keys);
    }

    fn on_unrecognized_file(&self, file_name: &str) {
        (self.on_unrecognized_file)(file_name);
    }
}
