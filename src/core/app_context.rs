/*
 * The explicitly constructed owner of all shared state in this layer:
 * both registries, both asset caches, and the settings cell. Consumers
 * receive a reference to the context instead of reaching for globals,
 * and tests get isolation through `new`/`reset`. The context also holds
 * the receiving end of the view command channel; whichever collaborator
 * plays selection authority drains it and calls the internal apply
 * operations on the affected views.
 */
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};

use super::asset_cache::{AssetCache, AssetGeneratorOperations, IconOptions, ThumbnailOptions};
use super::directory_registry::DirectoryRegistry;
use super::settings::{self, SettingsCell, SettingsManagerOperations};
use super::view_registry::ViewRegistry;
use super::view_state::ViewCommand;

pub const DEFAULT_APP_NAME: &str = "TreeBrowser";

pub struct AppContext {
    pub directories: DirectoryRegistry,
    pub views: ViewRegistry,
    pub icons: AssetCache<IconOptions>,
    pub thumbnails: AssetCache<ThumbnailOptions>,
    pub settings: SettingsCell,
    app_name: String,
    generator: Arc<dyn AssetGeneratorOperations>,
    settings_manager: Arc<dyn SettingsManagerOperations>,
    view_commands: Receiver<ViewCommand>,
}

impl AppContext {
    pub fn new(
        generator: Arc<dyn AssetGeneratorOperations>,
        settings_manager: Arc<dyn SettingsManagerOperations>,
    ) -> Self {
        Self::with_app_name(generator, settings_manager, DEFAULT_APP_NAME)
    }

    pub fn with_app_name(
        generator: Arc<dyn AssetGeneratorOperations>,
        settings_manager: Arc<dyn SettingsManagerOperations>,
        app_name: &str,
    ) -> Self {
        let (tx, rx) = channel();
        AppContext {
            directories: DirectoryRegistry::new(),
            views: ViewRegistry::new(tx),
            icons: AssetCache::for_icons(Arc::clone(&generator)),
            thumbnails: AssetCache::for_thumbnails(Arc::clone(&generator)),
            settings: SettingsCell::new(),
            app_name: app_name.to_string(),
            generator,
            settings_manager,
            view_commands: rx,
        }
    }

    /*
     * Tears the context down to a freshly constructed state: empty
     * registries, cold caches, default settings, a new command channel.
     * Existing store handles keep working but are no longer reachable
     * through the context.
     */
    pub fn reset(&mut self) {
        log::debug!("AppContext: reset");
        *self = Self::with_app_name(
            Arc::clone(&self.generator),
            Arc::clone(&self.settings_manager),
            &self.app_name,
        );
    }

    /* Non-blocking drain step for the selection authority. */
    pub fn try_recv_view_command(&self) -> Option<ViewCommand> {
        match self.view_commands.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn load_settings(&self) -> settings::Result<()> {
        self.settings
            .load_from(self.settings_manager.as_ref(), &self.app_name)
    }

    pub fn save_settings(&self) -> settings::Result<()> {
        self.settings
            .save_to(self.settings_manager.as_ref(), &self.app_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asset_cache::{Asset, AssetError};
    use crate::core::directory_store::Directory;
    use crate::core::entry::Entry;
    use crate::core::identity::DirectoryId;
    use crate::core::settings::Settings;
    use crate::core::view_state::DirectoryView;
    use std::sync::Mutex;

    struct StubGenerator;

    impl AssetGeneratorOperations for StubGenerator {
        fn generate_icon(&self, _: &[String], _: &IconOptions) -> Result<Asset, AssetError> {
            Ok(Asset {
                format: "png".to_string(),
                bytes: vec![0],
            })
        }
        fn generate_thumbnail(
            &self,
            _: &[String],
            _: &ThumbnailOptions,
        ) -> Result<Asset, AssetError> {
            Err(AssetError::Backend("unsupported".to_string()))
        }
    }

    struct MemorySettingsManager {
        stored: Mutex<Option<Settings>>,
    }

    impl SettingsManagerOperations for MemorySettingsManager {
        fn load_settings(&self, _: &str) -> settings::Result<Option<Settings>> {
            Ok(self.stored.lock().unwrap().clone())
        }
        fn save_settings(&self, _: &str, settings: &Settings) -> settings::Result<()> {
            *self.stored.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }

    fn test_context() -> AppContext {
        AppContext::new(
            Arc::new(StubGenerator),
            Arc::new(MemorySettingsManager {
                stored: Mutex::new(None),
            }),
        )
    }

    #[test]
    fn test_view_requests_flow_to_the_context_receiver() {
        let context = test_context();
        let view = context
            .views
            .add(DirectoryView::new(DirectoryId::new_v4(), DirectoryId::new_v4()));

        view.request_selection("f.txt", vec!["f.txt".to_string()]);

        let command = context.try_recv_view_command().unwrap();
        match command {
            ViewCommand::SelectFiles { view: id, focused, .. } => {
                assert_eq!(id, view.id());
                assert_eq!(focused, "f.txt");
            }
        }
        assert!(context.try_recv_view_command().is_none());
    }

    #[test]
    fn test_reset_gives_a_cold_isolated_context() {
        let mut context = test_context();
        let id = DirectoryId::new_v4();
        let store = context.directories.add_directory(Directory::new(id, "/d"));
        store.add_entry(Entry::new("a.txt"));
        context.icons.get(
            &["a.txt".to_string()],
            &IconOptions {
                width: 16,
                height: 16,
            },
        );
        assert_eq!(context.icons.len(), 1);

        context.reset();

        assert!(context.directories.is_empty());
        assert!(context.views.is_empty());
        assert!(context.icons.is_empty());
        assert_eq!(context.settings.snapshot(), Settings::default());
        // The pre-reset handle still works; it is simply orphaned.
        assert_eq!(store.entry_count(), 1);
        assert!(context.directories.get_by_id(&id).is_none());
    }

    #[test]
    fn test_settings_round_trip_through_the_context() {
        let context = test_context();
        let mut changed = context.settings.snapshot();
        changed.thumbnail_width = 50;
        context.settings.set(changed.clone());

        context.save_settings().unwrap();
        context.settings.reset();
        context.load_settings().unwrap();

        assert_eq!(context.settings.snapshot(), changed);
    }

    #[test]
    fn test_failed_thumbnail_degrades_to_sentinel() {
        let context = test_context();
        let asset = context.thumbnails.get(
            &["broken.mp4".to_string()],
            &ThumbnailOptions {
                max_width: 200,
                max_height: 200,
                method: crate::core::settings::ResampleMethod::NearestNeighbor,
            },
        );
        assert!(asset.is_sentinel());
        assert_eq!(context.thumbnails.failures().len(), 1);
    }
}
