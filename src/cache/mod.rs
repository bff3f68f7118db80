pub mod disk;
pub mod key;
pub mod memory;
pub mod tiered;

pub use disk::DiskCache;
pub use key::cache_key;
pub use tiered::ImageCache;
