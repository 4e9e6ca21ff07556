use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::gtfs::loaders::{LoadEventHandler, LogEventHandler};
use crate::gtfs::{Gtfs, GtfsLoadError, TableKind};

// ZipLoader reads a feed packed into a single zip archive.
pub struct ZipLoader<R: io::Read + io::Seek, Handler: LoadEventHandler> {
    pub zip: zip::ZipArchive<R>,
    pub event_handler: Handler,
}

impl ZipLoader<fs::File, LogEventHandler> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GtfsLoadError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| GtfsLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(zip::ZipArchive::new(file)?))
    }
}

impl<R: io::Read + io::Seek> ZipLoader<R, LogEventHandler> {
    pub fn new(zip: zip::ZipArchive<R>) -> Self {
        Self {
            zip,
            event_handler: LogEventHandler,
        }
    }
}

impl<R: io::Read + io::Seek, Handler: LoadEventHandler> ZipLoader<R, Handler> {
    pub fn with_event_handler<NewHandler: LoadEventHandler>(
        self,
        event_handler: NewHandler,
    ) -> ZipLoader<R, NewHandler> {
        ZipLoader {
            zip: self.zip,
            event_handler,
        }
    }

    // load reads every recognized table in the archive. Other entries are reported and skipped.
    pub fn load(mut self) -> Result<Gtfs, GtfsLoadError> {
        let mut gtfs = Gtfs::default();

        for i in 0..self.zip.len() {
            let file = self.zip.by_index(i)?;
            let file_name = file.name().to_string();

            if file.is_dir() {
                debug!("Skipping directory {} in archive", file_name);
                continue;
            }

            match TableKind::from_file_name(&file_name) {
                Some(kind) => {
                    self.event_handler.on_table_opened(kind, &file_name);
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
