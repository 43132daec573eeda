use std::path::Path;
use std::sync::Arc;
use bytes::Bytes;
use object_store::{ObjectStore, local::LocalFileSystem, path::Path as ObjectPath};

/// Creates an `ObjectStore` and path for a local file.
///
/// Relative paths are resolved against the current directory. The store is
/// rooted at the filesystem root and the returned path addresses the file
/// from there. File names are converted with
/// [`ObjectPath::from_absolute_path`], so characters the object store
/// reserves (`#`, `%`, `[` ...) still resolve to the file on disk.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined or the
/// path cannot be expressed as an object path.
///
/// # Examples
///
/// ```no_run
/// # use logsearch::utils::file_interaction::get_object_store;
/// # tokio_test::block_on(async {
/// let (store, path) = get_object_store("/var/log/batches/part-0001.parquet").unwrap();
/// let bytes = store.get(&path).await.unwrap().bytes().await.unwrap();
/// # });
/// ```
pub fn get_object_store(
    file_path: impl AsRef<Path>,
) -> Result<(Arc<dyn ObjectStore>, ObjectPath), object_store::Error> {
    let std_path = file_path.as_ref();
    let absolute_path = if std_path.is_absolute() {
        std_path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| object_store::Error::Generic {
                store: "LocalFileSystem",
                source: Box::new(source),
            })?
            .join(std_path)
    };

    let location = ObjectPath::from_absolute_path(&absolute_path)?;
    let store: Arc<dyn ObjectStore> = Arc::new(LocalFileSystem::new());
    Ok((store, location))
}

/// Reads an entire local file into memory through the object store.
pub async fn read_file_bytes(file_path: impl AsRef<Path>) -> Result<Bytes, object_store::Error> {
    let (store, path) = get_object_store(file_path)?;
    store.get(&path).await?.bytes().await
}
