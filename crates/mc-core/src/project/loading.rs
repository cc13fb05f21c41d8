//! Catalog discovery and domain loading

use crate::config::Config;
use crate::domain::{Domain, DomainCatalog};
use crate::error::{CoreError, CoreResult};
use crate::metric::{CategoryRecord, MetricCategory};
use crate::names::DomainId;
use crate::node::{CatalogKind, CatalogKindProbe};
use crate::semantic::SemanticLayer;
use crate::serde_helpers::deserialize_opt_scalar_string;
use crate::table::{TableDef, TableKind, TableSlot};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::Project;

/// Raw YAML structure of a bronze/silver/gold file.
///
/// Table records are read as [`TableSlot`]s so one malformed record can be
/// skipped without discarding the rest of the file.
#[derive(Debug, Deserialize)]
struct LayerFile {
    #[serde(default)]
    tables: Vec<TableSlot>,
    #[serde(default)]
    dimensions: Vec<TableSlot>,
    #[serde(default)]
    facts: Vec<TableSlot>,
    #[serde(
        default,
        alias = "estimatedSize",
        deserialize_with = "deserialize_opt_scalar_string"
    )]
    estimated_size: Option<String>,
}

/// Raw YAML structure of a metrics file.
#[derive(Debug, Deserialize)]
struct MetricsFile {
    #[serde(default)]
    categories: Vec<CategoryRecord>,
}

/// A catalog file whose `kind` was recognised.
struct CatalogFile {
    path: PathBuf,
    kind: CatalogKind,
    content: String,
}

/// Recursively collect `.yml`/`.yaml` files below `dir`, sorted by path.
pub(crate) fn discover_yaml_files(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        entries.push(entry.path());
    }
    entries.sort();

    for path in entries {
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }
        if path.is_dir() {
            discover_yaml_files(&path, files)?;
        } else if path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
            files.push(path);
        }
    }
    Ok(())
}

fn parse_error(path: &Path, e: impl std::fmt::Display) -> CoreError {
    CoreError::CatalogParse {
        path: path.display().to_string(),
        details: e.to_string(),
    }
}

/// Read every YAML file of a domain directory and keep those with a known kind.
fn read_catalog_files(dir: &Path) -> CoreResult<Vec<CatalogFile>> {
    let mut paths = Vec::new();
    discover_yaml_files(dir, &mut paths)?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let probe: CatalogKindProbe =
            serde_yaml::from_str(&content).map_err(|e| parse_error(&path, e))?;
        let kind = match probe.kind.as_deref().map(str::parse::<CatalogKind>) {
            Some(Ok(kind)) => kind,
            Some(Err(e)) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
            None => {
                log::warn!("Skipping {}: missing 'kind' field", path.display());
                continue;
            }
        };
        files.push(CatalogFile {
            path,
            kind,
            content,
        });
    }
    Ok(files)
}

/// Parse table records, skipping malformed ones, and append them to the
/// domain's layer catalog.
fn push_tables(
    catalog: &mut DomainCatalog,
    seen: &mut HashSet<String>,
    path: &Path,
    records: Vec<TableSlot>,
    kind: CatalogKind,
    table_kind: TableKind,
) -> CoreResult<()> {
    let Some(layer) = kind.layer() else {
        return Ok(());
    };
    for (index, slot) in records.into_iter().enumerate() {
        let TableSlot::Record(record) = slot else {
            log::warn!(
                "Skipping malformed {} record #{} in {}: not a table definition",
                layer,
                index + 1,
                path.display()
            );
            continue;
        };
        let table = match TableDef::from_record(record, layer, table_kind) {
            Ok(t) => t,
            Err(e) => {
                log::warn!(
                    "Skipping malformed {} record #{} in {}: {}",
                    layer,
                    index + 1,
                    path.display(),
                    e
                );
                continue;
            }
        };
        if !seen.insert(table.name.to_string()) {
            return Err(CoreError::DuplicateTable {
                table: table.name.to_string(),
                domain: catalog.domain.id.to_string(),
            });
        }
        catalog.layer_mut(layer).tables.push(table);
    }
    Ok(())
}

/// Load one domain directory.
pub(crate) fn load_domain(dir: &Path) -> CoreResult<DomainCatalog> {
    let files = read_catalog_files(dir)?;

    let mut domain_files = files.iter().filter(|f| f.kind == CatalogKind::Domain);
    let domain_file = domain_files.next().ok_or_else(|| CoreError::DomainFileMissing {
        path: dir.display().to_string(),
    })?;
    if domain_files.next().is_some() {
        return Err(CoreError::DuplicateDomainFile {
            path: dir.display().to_string(),
        });
    }

    let domain = parse_domain(&domain_file.path, &domain_file.content)?;
    if dir.file_name().and_then(|n| n.to_str()) != Some(domain.id.as_str()) {
        log::debug!(
            "Domain directory {} declares id '{}'",
            dir.display(),
            domain.id
        );
    }

    let mut catalog = DomainCatalog::new(domain);
    let mut seen = HashSet::new();

    for file in &files {
        match file.kind {
            CatalogKind::Domain => {}
            CatalogKind::Bronze | CatalogKind::Silver | CatalogKind::Gold => {
                let layer_file: LayerFile =
                    serde_yaml::from_str(&file.content).map_err(|e| parse_error(&file.path, e))?;
                if let Some(layer) = file.kind.layer() {
                    let layer_catalog = catalog.layer_mut(layer);
                    if layer_file.estimated_size.is_some() {
                        layer_catalog.estimated_size = layer_file.estimated_size;
                    }
                }
                push_tables(
                    &mut catalog,
                    &mut seen,
                    &file.path,
                    layer_file.tables,
                    file.kind,
                    TableKind::Table,
                )?;
                push_tables(
                    &mut catalog,
                    &mut seen,
                    &file.path,
                    layer_file.dimensions,
                    file.kind,
                    TableKind::Dimension,
                )?;
                push_tables(
                    &mut catalog,
                    &mut seen,
                    &file.path,
                    layer_file.facts,
                    file.kind,
                    TableKind::Fact,
                )?;
            }
            CatalogKind::Metrics => {
                let metrics: MetricsFile =
                    serde_yaml::from_str(&file.content).map_err(|e| parse_error(&file.path, e))?;
                catalog
                    .metrics
                    .extend(metrics.categories.into_iter().map(MetricCategory::from));
            }
            CatalogKind::Semantic => {
                let semantic: SemanticLayer =
                    serde_yaml::from_str(&file.content).map_err(|e| parse_error(&file.path, e))?;
                catalog
                    .semantic
                    .get_or_insert_with(SemanticLayer::default)
                    .extend(semantic);
            }
        }
    }

    log::debug!(
        "Loaded domain '{}': {} tables, {} metrics",
        catalog.domain.id,
        catalog.tables().count(),
        catalog.metric_count()
    );
    Ok(catalog)
}

fn parse_domain(path: &Path, content: &str) -> CoreResult<Domain> {
    serde_yaml::from_str(content).map_err(|e| parse_error(path, e))
}

impl Project {
    /// Load a catalog project from a directory
    pub fn load(path: &Path) -> CoreResult<Self> {
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !root.exists() {
            return Err(CoreError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }

        let config = Config::load_from_dir(&root)?;
        Self::load_with_config(root, config)
    }

    /// Load the catalog below `root` using an already parsed config.
    pub fn load_with_config(root: PathBuf, config: Config) -> CoreResult<Self> {
        let mut domains: BTreeMap<DomainId, DomainCatalog> = BTreeMap::new();
        let mut origins: BTreeMap<DomainId, PathBuf> = BTreeMap::new();

        for catalog_path in config.catalog_paths_absolute(&root) {
            if !catalog_path.is_dir() {
                log::warn!("Catalog path {} does not exist", catalog_path.display());
                continue;
            }

            let mut dirs = Vec::new();
            for entry in std::fs::read_dir(&catalog_path).map_err(|e| CoreError::IoWithPath {
                path: catalog_path.display().to_string(),
                source: e,
            })? {
                let entry = entry.map_err(|e| CoreError::IoWithPath {
                    path: catalog_path.display().to_string(),
                    source: e,
                })?;
                let path = entry.path();
                let hidden = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'));
                if path.is_dir() && !hidden {
                    dirs.push(path);
                }
            }
            dirs.sort();

            for dir in dirs {
                let catalog = load_domain(&dir)?;
                let id = catalog.domain.id.clone();
                if let Some(previous) = origins.get(&id) {
                    return Err(CoreError::DuplicateDomain {
                        id: id.to_string(),
                        path1: previous.display().to_string(),
                        path2: dir.display().to_string(),
                    });
                }
                origins.insert(id.clone(), dir);
                domains.insert(id, catalog);
            }
        }

        Ok(Project {
            root,
            config,
            domains,
        })
    }
}
