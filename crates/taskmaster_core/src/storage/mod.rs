pub mod blob_store;
pub mod persistence;

pub use blob_store::{BlobStore, FileBlobStore, MemoryBlobStore, store_dir};
