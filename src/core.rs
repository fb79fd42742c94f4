/*
 * The client-side data layer: observable mirrors of backend-owned entities
 * (directories, entries, views), path-indexed lookup, and memoized access
 * to backend-generated assets. Key abstractions are re-exported here;
 * backend seams (`AssetGeneratorOperations`, `SettingsManagerOperations`)
 * are traits so the transport stays swappable and testable.
 */
pub mod app_context;
pub mod asset_cache;
pub mod directory_registry;
pub mod directory_store;
pub mod entry;
pub mod identity;
pub mod observable;
pub mod path_tree;
pub mod path_utils;
pub mod settings;
pub mod view_registry;
pub mod view_state;


pub use identity::{DirectoryId, IdentityError, ViewId};

pub use observable::{Observable, SubscriptionId};

pub use entry::{Entry, EntryCell};

pub use path_tree::PathTree;

pub use directory_store::{Directory, DirectoryContents, DirectoryStore};

pub use directory_registry::{DirectoryRegistry, DirectoryRegistryContents};

pub use view_registry::{ViewRegistry, ViewRegistryContents};

pub use view_state::{DirectoryView, ViewCommand, ViewState};

pub use asset_cache::{
    Asset, AssetCache, AssetError, AssetFailure, AssetGeneratorOperations, IconOptions,
    ThumbnailOptions,
};

pub use settings::{
    CoreSettingsManager, ResampleMethod, Settings, SettingsCell, SettingsError,
    SettingsManagerOperations,
};

pub use app_context::{AppContext, DEFAULT_APP_NAME};
