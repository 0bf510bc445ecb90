//! `pw build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use pw_builder::{BuildConfig, BuildReport, StaticSiteBuilder};
use pw_config::{CliSettings, Config};

use super::load_site;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Theme name (overrides config).
    #[arg(short, long)]
    theme: Option<String>,

    /// Keep existing files in the output directory.
    #[arg(long)]
    no_clean: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading or generation fails.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            theme: self.theme,
            clean: self.no_clean.then_some(false),
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let output_dir = &config.paths_resolved.output_dir;

        output.info(&format!(
            "Content: {}",
            config.paths_resolved.content_dir.display()
        ));
        output.info(&format!("Theme: {}", config.theme_dir().display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let languages = config.languages()?;
        let builder = StaticSiteBuilder::new(BuildConfig {
            theme_dir: config.theme_dir(),
            site_title: config.site.title.clone(),
        })?;

        if config.build.clean && output_dir.exists() {
            tracing::info!(path = %output_dir.display(), "Cleaning output directory");
            fs::remove_dir_all(output_dir)?;
        }

        if languages.is_empty() {
            output.warning("No languages found in content directory");
        }

        let mut total = BuildReport::default();
        for lang in &languages {
            let site = load_site(&config, lang)?;
            let report = builder.build(&site, lang, &output_dir.join(lang))?;
            output.info(&format!(
                "  {lang}: {} pages, {} assets",
                report.pages, report.assets
            ));
            total.pages += report.pages;
            total.assets += report.assets;
        }

        output.success(&format!(
            "Built {} pages in {} languages to {}",
            total.pages,
            languages.len(),
            output_dir.display()
        ));
        Ok(())
    }
}
