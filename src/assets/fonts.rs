use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

static SYSTEM_FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// Process-wide font database: system fonts plus any `fonts/` next to the working directory.
pub(crate) fn shared_fontdb() -> Arc<usvg::fontdb::Database> {
    SYSTEM_FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            load_fonts_from_dir(&mut db, Path::new("fonts"));
            tracing::debug!(faces = db.faces().count(), "font database loaded");
            Arc::new(db)
        })
        .clone()
}

/// SVG parse options sharing the process font database.
pub(crate) fn svg_options(resources_dir: Option<PathBuf>) -> usvg::Options<'static> {
    usvg::Options {
        resources_dir,
        fontdb: shared_fontdb(),
        ..Default::default()
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}
