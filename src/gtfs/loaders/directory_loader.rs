use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::gtfs::loaders::{LoadEventHandler, LogEventHandler};
use crate::gtfs::{Gtfs, GtfsLoadError, TableKind};

// DirectoryLoader reads a feed stored as one .txt file per table in a directory.
pub struct DirectoryLoader<Handler: LoadEventHandler> {
    pub path: PathBuf,
    pub event_handler: Handler,
}

impl DirectoryLoader<LogEventHandler> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            event_handler: LogEventHandler,
        }
    }
}

impl<Handler: LoadEventHandler> DirectoryLoader<Handler> {
    pub fn with_event_handler<NewHandler: LoadEventHandler>(
        self,
        event_handler: NewHandler,
    ) -> DirectoryLoader<NewHandler> {
        DirectoryLoader {
            path: self.path,
            event_handler,
        }
    }

    // load reads every recognized table file, in file name order. Subdirectories are ignored,
    // other files are reported and skipped.
    pub fn load(self) -> Result<Gtfs, GtfsLoadError> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| GtfsLoadError::Io { path, source }
        };

        let mut entries = fs::read_dir(&self.path)
            .map_err(io_error(&self.path))?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error(&self.path))?;
        entries.sort();

        let mut gtfs = Gtfs::default();
        for path in entries {
            if !path.is_file() {
                debug!("Skipping {} in feed directory", path.display());
                continue;
            }

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            match TableKind::from_file_name(&file_name) {
                Some(kind) => {
                    self.event_handler.on_table_opened(kind, &file_name);
                    let file = fs::File::open(&path).map_err(io_error(&path))?;
                    let keys = gtfs
                        .load_table(kind, file)
                        .map_err(|source| GtfsLoadError::Table {
                            file_name: file_name.clone(),
                            source,
                        })?;
                    self.event_handler.on_table_loaded(kind, keys);
                }
                None => self.event_handler.on_unrecognized_file(&file_name),
            }
        }

        Ok(gtfs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::gtfs::loaders::FnLoadEventHandler;

    #[test]
    fn loads_tables_and_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stops.txt"), "\u{feff}stop_id,stop_name\nA,Alpha\n").unwrap();
        fs::write(dir.path().join("transfers.txt"), "from_stop_id,to_stop_id\nA,A\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let skipped = Rc::new(RefCell::new(Vec::new()));
        let recorder = skipped.clone();
        let handler = FnLoadEventHandler {
            on_unrecognized_file: Box::new(move |name: &str| recorder.borrow_mut().push(name.to_string())),
            ..FnLoadEventHandler::default()
        };

        let gtfs = DirectoryLoader::new(dir.path())
            .with_event_handler(handler)
            .load()
            .unwrap();
        assert_eq!(gtfs.stops().get("A").unwrap().get("stop_name"), Some("Alpha"));
        assert_eq!(*skipped.borrow(), vec!["transfers.txt".to_string()]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DirectoryLoader::new(dir.path().join("absent")).load();
        assert!(matches!(result, Err(GtfsLoadError::Io { .. })));
    }
}
