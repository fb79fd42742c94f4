/*
 * Filesystem locations for per-user application data. Only the settings
 * passthrough needs this; everything else in the layer is in-memory.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Resolves the application's local (non-roaming) config directory and
 * creates it if needed. Returns `None` when the platform offers no such
 * location or the directory cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!("PathUtils: failed to create config directory {config_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: created config directory {config_path:?}");
    }
    Some(config_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_is_created_and_named_after_app() {
        let app_name = format!("TreeBrowserTest_{}", rand::random::<u64>());

        let dir = get_base_app_config_local_dir(&app_name)
            .expect("Platform should provide a config directory");
        assert!(dir.exists());
        assert!(
            dir.to_string_lossy()
                .to_lowercase()
                .contains(&app_name.to_lowercase())
        );

        // Cleanup the per-test directory.
        let _ = fs::remove_dir_all(&dir);
    }
}
