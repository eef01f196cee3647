//! Directory-per-object store on the local filesystem.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use quiver_types::ObjectId;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::{ObjectRecord, META_FILE, NOTES_FILE};
use crate::traits::ObjectStore;

/// Object store rooted at a directory.
///
/// Objects live in `<root>/<objects_dir>/<id-8hex>/`. Nothing is touched on
/// construction; directories are created lazily on the first write.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    objects: PathBuf,
    config: StoreConfig,
}

impl FsObjectStore {
    /// A store at `root` with the default configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, StoreConfig::default())
    }

    /// A store at `root` with an explicit configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: StoreConfig) -> Self {
        let root = root.into();
        let objects = root.join(&config.objects_dir);
        Self {
            root,
            objects,
            config,
        }
    }

    /// The directory holding one subdirectory per object.
    pub fn objects_dir(&self) -> &Path {
        &self.objects
    }

    /// The directory of a single object.
    pub fn object_dir(&self, id: ObjectId) -> PathBuf {
        self.objects.join(id.to_hex())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn create_dirs(&self, path: &Path) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.config.dir_mode);
        }
        builder.create(path)
    }

    fn write_file(&self, path: &Path, contents: &str) -> StoreResult<()> {
        let mut file = File::create(path).map_err(StoreError::io(path))?;
        file.write_all(contents.as_bytes())
            .map_err(StoreError::io(path))?;
        if self.config.sync_writes {
            file.sync_all().map_err(StoreError::io(path))?;
        }
        Ok(())
    }
}

impl ObjectStore for FsObjectStore {
    fn list(&self) -> StoreResult<Vec<ObjectId>> {
        let entries = match fs::read_dir(&self.objects) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %self.objects.display(), "no objects directory; store is empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.objects)(e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(&self.objects))?;
            let file_type = entry.file_type().map_err(StoreError::io(entry.path()))?;
            if !file_type.is_dir() {
                warn!(path = %entry.path().display(), "skipping non-directory entry");
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let id = ObjectId::from_hex(&name)
                .map_err(|_| StoreError::InvalidIdentifier(name.to_string()))?;
            // Records are read back from `object_dir`, so only the canonical
            // spelling of a non-null id names an object.
            if id.is_null() || id.to_hex() != *name {
                return Err(StoreError::InvalidIdentifier(name.to_string()));
            }
            ids.push(id);
        }
        Ok(ids)
    }

    fn read(&self, id: ObjectId) -> StoreResult<ObjectRecord> {
        let dir = self.object_dir(id);

        let meta_path = dir.join(META_FILE);
        let meta = match fs::read_to_string(&meta_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::MissingRecord(id))
            }
            Err(e) => return Err(StoreError::io(meta_path)(e)),
        };
        let mut record = ObjectRecord::decode_meta(id, &meta)?;

        let notes_path = dir.join(NOTES_FILE);
        match fs::read_to_string(&notes_path) {
            Ok(text) => record.notes = ObjectRecord::decode_notes(id, &text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(notes_path)(e)),
        }

        debug!(%id, "read object record");
        Ok(record)
    }

    fn write(&self, record: &ObjectRecord) -> StoreResult<()> {
        let meta = record.encode_meta()?;
        let notes = record.encode_notes()?;

        let dir = self.object_dir(record.id);
        self.create_dirs(&dir).map_err(StoreError::io(&dir))?;

        self.write_file(&dir.join(META_FILE), &meta)?;

        let notes_path = dir.join(NOTES_FILE);
        match notes {
            Some(text) => self.write_file(&notes_path, &text)?,
            None => match fs::remove_file(&notes_path) {
                Ok(()) => debug!(id = %record.id, "removed stale notes record"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::io(notes_path)(e)),
            },
        }

        debug!(id = %record.id, "wrote object record");
        Ok(())
    }

    fn exists(&self, id: ObjectId) -> StoreResult<bool> {
        let meta_path = self.object_dir(id).join(META_FILE);
        meta_path.try_exists().map_err(StoreError::io(meta_path))
    }

    fn root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}
