pub mod fs;
pub mod leaf;
pub mod rename;
pub mod touch;
pub mod group;
pub mod resolver;
pub use fs::{FileSystem, RealFs, FileStamp};
pub use leaf::{LeafCommand, FileCommand, ReverseCommand};
pub use rename::RenameCmd;
pub use touch::TouchCmd;
pub use group::{DeleteCmd, CopyCmd, MoveCmd, CreateFolderCmd};
pub use resolver::{build_rename_macro, validate_pairs, intermediate_path};
#[cfg(test)]
pub(crate) use fs::testing;
