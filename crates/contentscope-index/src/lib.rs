//! contentscope-index
//!
//! Builds the reverse dependency index of a build: every content asset
//! reachable from the enabled scenes, its size on disk, and the assets that
//! reference it directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use contentscope_index::{ContentsExplorer, DependencyIndexBuilder, ExclusionRules};
//! use contentscope_store::{FilesystemRoot, ProjectStore};
//!
//! let store = ProjectStore::open("MyGame")?;
//! let fs = FilesystemRoot::new("MyGame")?;
//! let mut explorer = ContentsExplorer::new(store, fs, vec!["Assets/Scenes/Main.unity".into()]);
//!
//! explorer.refresh()?;
//! for row in explorer.table() {
//!     println!("{} <- {:?}", row.file_name, row.referenced_by);
//! }
//! ```

pub mod builder;
pub mod explorer;
pub mod filter;
pub mod logging;
pub mod search;

pub use builder::DependencyIndexBuilder;
pub use explorer::ContentsExplorer;
pub use filter::ExclusionRules;
pub use search::{RowQuery, SortKey, sort_rows};
