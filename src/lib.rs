#[cfg(feature = "directory")]
pub use dirbatch_directory as directory;

#[cfg(feature = "provisioning")]
pub use dirbatch_provisioning as provisioning;
