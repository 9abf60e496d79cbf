use std::{fs, path::Path, sync::mpsc::Sender, sync::Arc, thread};

use parking_lot::Mutex;
use tessera_engine::{EngineResult, Inspect, Persistence, Thumbnail, TileNode};

/// Tile save/open backed by native file dialogs and JSON files on disk.
///
/// Saving happens inline (the dialog blocks the UI thread, as file pickers
/// do). Opening runs on a worker thread and reports back over the sender
/// handed in by the grid, so a cancelled dialog simply drops the sender.
#[derive(Default)]
pub struct FilePersistence {}

impl Persistence for FilePersistence {
    fn save(&mut self, node: &TileNode, thumbnail: Option<Thumbnail>) -> EngineResult<()> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Tile definition", &["json"])
            .set_file_name("tile.json")
            .save_file()
        else {
            return Ok(());
        };
        fs::write(&path, serde_json::to_string_pretty(node)?)?;
        log::info!("Saved tile to {path:?}");
        if let Some(thumbnail) = thumbnail {
            write_thumbnail(&path.with_extension("png"), &thumbnail);
        }
        Ok(())
    }

    fn open(&mut self, reply: Sender<TileNode>) -> EngineResult<()> {
        thread::spawn(move || {
            let Some(path) = rfd::FileDialog::new()
                .add_filter("Tile definition", &["json"])
                .pick_file()
            else {
                return;
            };
            match load_tile(&path) {
                Ok(node) => {
                    let _ = reply.send(node);
                }
                Err(err) => log::error!("Error loading tile from {path:?}: {err}"),
            }
        });
        Ok(())
    }
}

pub fn load_tile(path: &Path) -> EngineResult<TileNode> {
    let txt = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&txt)?)
}

fn write_thumbnail(path: &Path, thumbnail: &Thumbnail) {
    let Some(img) =
        image::RgbaImage::from_raw(thumbnail.width, thumbnail.height, thumbnail.rgba.clone())
    else {
        log::error!("Thumbnail pixel buffer has the wrong size, skipping {path:?}");
        return;
    };
    if let Err(err) = img.save(path) {
        log::error!("Error writing thumbnail {path:?}: {err}");
    }
}

/// Inspect sink shown as an egui window. The grid pushes formatted tile
/// definitions here; the main window drains and displays them.
#[derive(Default, Clone)]
pub struct InspectSink {
    text: Arc<Mutex<Option<String>>>,
}

impl InspectSink {
    pub fn text(&self) -> Arc<Mutex<Option<String>>> {
        self.text.clone()
    }
}

impl Inspect for InspectSink {
    fn inspect(&mut self, body: &str) {
        *self.text.lock() = Some(body.to_string());
    }
}
