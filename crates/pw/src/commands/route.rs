//! `pw route` command implementation.

use std::path::Path;

use clap::Args;
use pw_config::Config;
use pw_site::{ROUTES_FILE, Router};

use super::{load_site, normalize_path};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the route command.
#[derive(Args)]
pub(crate) struct RouteArgs {
    /// Content language.
    lang: String,

    /// Page path (`/` for the root).
    path: String,
}

impl RouteArgs {
    /// Execute the route command.
    ///
    /// Prints the template name. Paths that aren't pages of the language
    /// are still resolved, with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules can't be loaded or no rule yields a
    /// template for the path.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, None)?;
        let site = load_site(&config, &self.lang)?;
        let path = normalize_path(&self.path);

        if site.find_by_path(&path).is_none() {
            output.warning(&format!("No page at '{path}' in '{}'", self.lang));
        }

        let router = Router::from_file(&config.theme_dir().join(ROUTES_FILE))?;
        output.result(router.require(&path)?);
        Ok(())
    }
}
