use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::cache::DatasetCache;
use crate::data::filter::FilterSelection;
use crate::data::loader::{load_file, LoadedDataset};

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChoice {
    /// The configured default file, loaded through the cache.
    DefaultFile,
    /// A file the user picked, loaded uncached.
    OpenedFile,
}

/// A categorical filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    City,
    Product,
}

/// Message shown in the top bar after a load or an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Info(msg) | Status::Error(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Cities,
    Products,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Memoized loads of the default file.
    pub cache: DatasetCache,

    /// Path behind [`SourceChoice::DefaultFile`].
    pub default_source: PathBuf,

    pub source_choice: SourceChoice,

    /// Currently loaded dataset (None until a load succeeds).
    pub loaded: Option<Arc<LoadedDataset>>,

    /// Display name of the loaded source.
    pub source_label: Option<String>,

    /// Current filter selection; rebuilt to "everything" on every load.
    pub selection: Option<FilterSelection>,

    /// Stable bar colours per city / product.
    pub city_colors: ColorMap,
    pub product_colors: ColorMap,

    pub active_tab: Tab,

    /// Outcome of the last load or export.
    pub status: Option<Status>,
}

impl AppState {
    pub fn new(default_source: PathBuf) -> Self {
        Self {
            cache: DatasetCache::new(),
            default_source,
            source_choice: SourceChoice::DefaultFile,
            loaded: None,
            source_label: None,
            selection: None,
            city_colors: ColorMap::default(),
            product_colors: ColorMap::default(),
            active_tab: Tab::default(),
            status: None,
        }
    }

    /// Load (or reuse from the cache) the default source.
    pub fn load_default(&mut self) {
        self.source_choice = SourceChoice::DefaultFile;
        let path = self.default_source.clone();
        let result = self
            .cache
            .load(&path)
            .with_context(|| format!("loading {}", path.display()));
        self.apply_load(result, &path);
    }

    /// Drop the cached default source and parse it again.
    pub fn reload_default(&mut self) {
        self.cache.invalidate(&self.default_source);
        self.load_default();
    }

    /// Load a user-picked file, bypassing the cache.
    pub fn load_opened(&mut self, path: &Path) {
        self.source_choice = SourceChoice::OpenedFile;
        let result = load_file(path)
            .map(Arc::new)
            .with_context(|| format!("loading {}", path.display()));
        if let Ok(loaded) = &result {
            log::info!(
                "opened {} ({} rows, {} dropped)",
                path.display(),
                loaded.cleaning.rows_kept,
                loaded.cleaning.rows_dropped()
            );
        }
        self.apply_load(result, path);
    }

    fn apply_load(&mut self, result: Result<Arc<LoadedDataset>>, path: &Path) {
        match result {
            Ok(loaded) => {
                self.source_label = path.file_name().map(|n| n.to_string_lossy().into_owned());
                self.set_dataset(loaded);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.clear_dataset();
                self.status = Some(Status::Error(format!(
                    "Falha ao carregar {}: {}",
                    path.display(),
                    e.root_cause()
                )));
            }
        }
    }

    /// Ingest a newly loaded dataset, select everything and rebuild colours.
    pub fn set_dataset(&mut self, loaded: Arc<LoadedDataset>) {
        let dataset = &loaded.dataset;
        self.selection = FilterSelection::full(dataset);
        self.city_colors = ColorMap::new(dataset.cities());
        self.product_colors = ColorMap::new(dataset.products());
        self.status = match loaded.cleaning.rows_dropped() {
            0 => None,
            n => Some(Status::Info(format!("{n} linha(s) inválida(s) ignorada(s)"))),
        };
        self.loaded = Some(loaded);
    }

    /// Forget the current dataset (e.g. switching to an upload not yet made).
    pub fn clear_dataset(&mut self) {
        self.loaded = None;
        self.selection = None;
        self.source_label = None;
        self.status = None;
    }

    /// Set the date window, ordered and clamped to the dataset extent.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let (Some(loaded), Some(sel)) = (&self.loaded, self.selection.take()) else {
            return;
        };
        self.selection = Some(FilterSelection { start, end, ..sel }.clamped_to(&loaded.dataset));
    }

    fn allowed_mut(&mut self, dim: Dimension) -> Option<&mut BTreeSet<String>> {
        let sel = self.selection.as_mut()?;
        Some(match dim {
            Dimension::City => &mut sel.cities,
            Dimension::Product => &mut sel.products,
        })
    }

    /// All values of a dimension present in the dataset.
    pub fn all_values(&self, dim: Dimension) -> BTreeSet<String> {
        match (&self.loaded, dim) {
            (Some(l), Dimension::City) => l.dataset.cities().clone(),
            (Some(l), Dimension::Product) => l.dataset.products().clone(),
            (None, _) => BTreeSet::new(),
        }
    }

    /// Bar / label colours for a dimension.
    pub fn colors(&self, dim: Dimension) -> &ColorMap {
        match dim {
            Dimension::City => &self.city_colors,
            Dimension::Product => &self.product_colors,
        }
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        self.selection.as_ref().is_some_and(|sel| match dim {
            Dimension::City => sel.cities.contains(value),
            Dimension::Product => sel.products.contains(value),
        })
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        if let Some(selected) = self.allowed_mut(dim) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
        }
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        let all = self.all_values(dim);
        if let Some(selected) = self.allowed_mut(dim) {
            *selected = all;
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        if let Some(selected) = self.allowed_mut(dim) {
            selected.clear();
        }
    }
}
