//! Static site builder.
//!
//! A theme directory provides everything the builder needs:
//!
//! ```text
//! themes/default/
//! ├── routes.conf     # page path -> template rules
//! ├── templates/      # minijinja templates
//! └── static/         # copied verbatim to the output root
//! ```
//!
//! Output layout for one content tree:
//!
//! ```text
//! www/en/
//! ├── data.json
//! ├── index.html
//! └── blog/
//!     ├── index.html
//!     └── assets/...
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{Environment, context, path_loader};
use pw_site::{PageId, ROUTES_FILE, RouteError, Router, Site, SiteError, SiteTree};
use pw_storage::{StorageError, join_path};
use rayon::prelude::*;

use crate::copy::copy_dir_all;
use crate::template::PageObject;

/// Templates folder inside a theme.
const TEMPLATES_DIR: &str = "templates";

/// Static files folder inside a theme.
const STATIC_DIR: &str = "static";

/// Tree dump written at the output root.
const DATA_FILE: &str = "data.json";

/// Rendered file name inside each page's output directory.
const INDEX_FILE: &str = "index.html";

/// Configuration for static site building.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Theme directory holding `routes.conf`, `templates/` and `static/`.
    pub theme_dir: PathBuf,
    /// Site title, exposed to templates as `site_title`.
    pub site_title: String,
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Theme has no templates folder.
    #[error("Templates folder not found: {}", .0.display())]
    MissingTemplates(PathBuf),
    /// Routing rules failed to load or resolve.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// Resolved template file doesn't exist.
    #[error("Template '{template}' for page '{path}' not found")]
    TemplateNotFound {
        /// Template name from the routing rules.
        template: String,
        /// Page being rendered.
        path: String,
    },
    /// Template failed to load or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    /// Site operation failed.
    #[error(transparent)]
    Site(#[from] SiteError),
    /// Reading from content storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Tree dump couldn't be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Summary of a finished build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages rendered.
    pub pages: usize,
    /// Page assets copied.
    pub assets: usize,
}

/// Builds a static site from loaded content trees.
pub struct StaticSiteBuilder {
    config: BuildConfig,
    router: Router,
    env: Environment<'static>,
    templates_dir: PathBuf,
}

impl StaticSiteBuilder {
    /// Create a builder for a theme.
    ///
    /// Loads and compiles the theme's routing rules once.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTemplates`] if the theme has no
    /// `templates/` folder, or [`BuildError::Route`] if `routes.conf` is
    /// missing or invalid.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates_dir = config.theme_dir.join(TEMPLATES_DIR);
        if !templates_dir.is_dir() {
            return Err(BuildError::MissingTemplates(templates_dir));
        }
        let router = Router::from_file(&config.theme_dir.join(ROUTES_FILE))?;

        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));

        Ok(Self {
            config,
            router,
            env,
            templates_dir,
        })
    }

    /// Routing rules of the theme.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Generate the output tree for one site.
    ///
    /// Writes `data.json`, copies the theme's static files, then renders
    /// every page to `<out_dir>/<path>/index.html` alongside its assets.
    /// Pages are rendered in parallel; the first failure aborts the build.
    ///
    /// # Arguments
    ///
    /// * `site` - Loaded content tree
    /// * `lang` - Language of the tree, exposed to templates as `lang`
    /// * `out_dir` - Output directory for this tree
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on routing misses, missing templates, render
    /// failures and I/O errors.
    pub fn build(&self, site: &Site, lang: &str, out_dir: &Path) -> Result<BuildReport, BuildError> {
        fs::create_dir_all(out_dir)?;

        let tree = Arc::new(site.tree().clone());
        let dump = serde_json::to_string_pretty(&tree.to_json(tree.root()))?;
        fs::write(out_dir.join(DATA_FILE), dump)?;

        let static_dir = self.config.theme_dir.join(STATIC_DIR);
        if static_dir.is_dir() {
            let copied = copy_dir_all(&static_dir, out_dir)?;
            tracing::debug!(files = copied, "Copied theme static files");
        } else {
            tracing::warn!(path = %static_dir.display(), "Theme has no static folder");
        }

        let assets = tree
            .walk()
            .par_iter()
            .map(|&id| self.build_page(site, &tree, id, lang, out_dir))
            .collect::<Result<Vec<_>, _>>()?;

        let report = BuildReport {
            pages: assets.len(),
            assets: assets.iter().sum(),
        };
        tracing::info!(lang, pages = report.pages, assets = report.assets, "Built site");
        Ok(report)
    }

    /// Render one page and copy its assets. Returns the number of assets.
    fn build_page(
        &self,
        site: &Site,
        tree: &Arc<SiteTree>,
        id: PageId,
        lang: &str,
        out_dir: &Path,
    ) -> Result<usize, BuildError> {
        let page = &tree[id];
        let path = page.path();

        let template_name = self.router.require(path)?;
        if !self.templates_dir.join(template_name).is_file() {
            return Err(BuildError::TemplateNotFound {
                template: template_name.to_owned(),
                path: path.to_owned(),
            });
        }

        let template = self.env.get_template(template_name)?;
        let html = template.render(context! {
            page => PageObject::value(tree, id),
            site => PageObject::value(tree, tree.root()),
            site_title => self.config.site_title.as_str(),
            lang => lang,
        })?;

        let page_dir = out_dir.join(path);
        fs::create_dir_all(&page_dir)?;
        fs::write(page_dir.join(INDEX_FILE), html)?;

        let assets = site.list_assets(path)?;
        for relative in &assets {
            let bytes = site.storage().read_bytes(&join_path(path, relative))?;
            let target = page_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, bytes)?;
        }

        tracing::info!(path, template = template_name, "Rendered page");
        Ok(assets.len())
    }
}
