use std::sync::Arc;

use crate::config::Config;
use crate::export::{DocumentPacker, DocxPacker, ExportGate, Rasterizer, SvgRasterizer};
use crate::layout::{build_measurer, LayoutMeasurer, PageFormat};
use crate::storage::{DocumentStore, FileStore};

/// Collaborators shared by every command of one process run.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    /// Pluggable block measurer. Default: MetricMeasurer. Swap via RESUME_LAYOUT_MEASURER.
    pub measurer: Arc<dyn LayoutMeasurer>,
    pub rasterizer: Arc<dyn Rasterizer>,
    pub packer: Arc<dyn DocumentPacker>,
    pub page_format: PageFormat,
    pub export_gate: Arc<ExportGate>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(FileStore::new(&config.data_dir));
        let measurer: Arc<dyn LayoutMeasurer> = Arc::from(build_measurer(config.layout_measurer));
        let rasterizer = Arc::new(SvgRasterizer::new(config.render_scale));
        Self {
            config,
            store,
            measurer,
            rasterizer,
            packer: Arc::new(DocxPacker),
            page_format: PageFormat::a4(),
            export_gate: Arc::new(ExportGate::default()),
        }
    }
}
