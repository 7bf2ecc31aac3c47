// layout export to json

use std::fs;
use std::path::Path;

use tracing::info;

use crate::city::Layout;
use crate::error::ExportError;

/// Pretty-printed json document of the layout
pub fn layout_to_json(layout: &Layout) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(layout)?)
}

pub fn write_layout_json(layout: &Layout, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let json = layout_to_json(layout)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| ExportError::io(path, e))?;

    let stats = layout.stats();
    info!(
        path = %path.display(),
        courtyards = stats.courtyards,
        rooms = stats.rooms,
        houses = stats.houses,
        "exported layout"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{generate, LayoutParams};

    #[test]
    fn json_round_trips_through_serde() {
        let layout = generate(&LayoutParams { courtyard_count: 2, ..Default::default() });
        let json = layout_to_json(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a dir").unwrap();

        let layout = generate(&LayoutParams { courtyard_count: 1, ..Default::default() });
        let err = write_layout_json(&layout, blocker.join("nested/layout.json")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }), "{err}");
    }
}
