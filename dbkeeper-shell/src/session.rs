use dbkeeper_store::{Catalog, Database};

use crate::config::Config;

/// State carried between menu actions: the storage directory and the
/// currently open database.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    current: Option<Database>,
    page_size: usize,
}

impl Session {
    pub fn new(catalog: Catalog, page_size: usize) -> Self {
        Self {
            catalog,
            current: None,
            page_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Catalog::new(&config.data_dir), config.page_size)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current(&self) -> Option<&Database> {
        self.current.as_ref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn open(&mut self, db: Database) {
        self.current = Some(db);
    }

    pub fn close(&mut self) -> Option<Database> {
        self.current.take()
    }
}
