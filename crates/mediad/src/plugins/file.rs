use std::path::Path;

use mediad_input::InputPlugin;

/// Opens local files addressed by absolute path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilePlugin;

impl InputPlugin for FilePlugin {
    fn name(&self) -> &str {
        "file"
    }

    fn supports_uri(&self, uri: &str) -> bool {
        Path::new(uri).is_absolute()
    }
}
