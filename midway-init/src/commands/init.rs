//! Project scaffolding command
//!
//! Runs strictly forward through [`RunState`]: parse arguments, load the
//! catalog, resolve the template source, resolve the target directory,
//! collect parameters, generate, report. Any error aborts the run; nothing is
//! retried or resumed.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::args::InitArgs;
use crate::catalog::TemplateCatalog;
use crate::collector::form_prompt;
use crate::config::InitConfig;
use crate::error::{InitError, InitResult};
use crate::generator::{
    FsGeneratorEngine, GeneratorEngine, GeneratorHandle, Parameters, TemplateSource,
};
use crate::paths::absolute_from;
use crate::prompt::{
    configure, DialoguerPrompter, NoopHook, PromptHandle, PromptSpec, PromptValue, Prompter,
    SubmitHook,
};
use crate::source::{selection_prompt, ResolvedSource, SourceKind};

/// Directory offered when `--dir` is not given
pub const DEFAULT_TARGET_DIR: &str = "my_midway_app";

/// Message of the target directory prompt
pub const DIR_MESSAGE: &str = "The directory where the boilerplate should be created";

/// Announcements printed before generation, one per tick
const COUNTDOWN: [&str; 4] = ["1...", "2...", "3...", "Enjoy it..."];

/// Progress of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    /// Nothing has happened yet
    Start,
    /// Arguments are parsed
    ArgumentsParsed,
    /// The template catalog is loaded
    CatalogLoaded,
    /// The template source is known
    SourceResolved,
    /// The target directory is known
    DirectoryResolved,
    /// Template parameters are collected
    ParametersCollected,
    /// The project is generated
    Generated,
    /// The closing notice is printed
    Done,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Absolute directory the project was written to
    pub target_path: PathBuf,
    /// Template source that was rendered
    pub source: TemplateSource,
    /// Catalog name, when the template came from the catalog
    pub template_name: Option<String>,
    /// Collected parameters; `None` when the template declares none
    pub parameters: Option<Parameters>,
}

/// Create a new project from a template
pub struct InitCommand {
    config: InitConfig,
    prompter: Arc<dyn Prompter>,
    engine: Arc<dyn GeneratorEngine>,
    hook: Arc<dyn SubmitHook>,
    state: RunState,
    target_path: Option<PathBuf>,
    template_name: Option<String>,
    prompt: Option<PromptHandle>,
}

impl InitCommand {
    /// Command using terminal prompts and the filesystem generator
    #[must_use]
    pub fn new(config: InitConfig) -> Self {
        Self {
            config,
            prompter: Arc::new(DialoguerPrompter::new()),
            engine: Arc::new(FsGeneratorEngine),
            hook: Arc::new(NoopHook),
            state: RunState::Start,
            target_path: None,
            template_name: None,
            prompt: None,
        }
    }

    /// Replace the interactive primitives
    #[must_use]
    pub fn with_prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Replace the generator engine
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn GeneratorEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Install a hook awaited before every prompt
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn SubmitHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Preset the target directory; a later `--dir` or prompt is skipped
    #[must_use]
    pub fn with_target_path(mut self, target_path: impl Into<PathBuf>) -> Self {
        self.target_path = Some(target_path.into());
        self
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Effective configuration
    #[must_use]
    pub const fn config(&self) -> &InitConfig {
        &self.config
    }

    /// Target directory, once resolved
    #[must_use]
    pub fn target_path(&self) -> Option<&Path> {
        self.target_path.as_deref()
    }

    /// Catalog template name, once selected
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.template_name.as_deref()
    }

    /// The current prompt
    #[must_use]
    pub const fn prompt(&self) -> Option<&PromptHandle> {
        self.prompt.as_ref()
    }

    /// Make `spec` the current prompt, wrapped so the hook runs first
    ///
    /// Visibility follows the `interactive` setting.
    pub fn set_prompt(&mut self, spec: PromptSpec) {
        let spec = spec.visible(self.config.interactive);
        self.prompt = Some(configure(
            spec,
            Arc::clone(&self.prompter),
            Arc::clone(&self.hook),
        ));
    }

    async fn run_prompt(&mut self) -> InitResult<PromptValue> {
        self.prompt
            .as_mut()
            .ok_or(InitError::PromptConsumed)?
            .run()
            .await
    }

    /// Parse `argv` and run
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; see [`InitError`].
    pub async fn run<I, T>(&mut self, cwd: &Path, argv: I) -> InitResult<RunSummary>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.ensure_fresh()?;
        let args = InitArgs::try_parse_argv(argv)?;
        self.run_with_args(cwd, args).await
    }

    /// Run with already parsed arguments
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; see [`InitError`].
    pub async fn run_with_args(&mut self, cwd: &Path, args: InitArgs) -> InitResult<RunSummary> {
        self.ensure_fresh()?;
        self.config = self.config.clone().with_args(&args);
        self.advance(RunState::ArgumentsParsed);

        let catalog = TemplateCatalog::load(&self.config.catalog_source(cwd))?;
        self.advance(RunState::CatalogLoaded);

        let resolved = self
            .resolve_source(SourceKind::from_args(&args), &catalog, cwd)
            .await?;
        self.advance(RunState::SourceResolved);

        let target_path = self.resolve_target_dir(args.dir.as_deref(), cwd).await?;
        self.advance(RunState::DirectoryResolved);

        let mut generator = self.bind(resolved.source(), &target_path);
        let parameters = self.collect_parameters(generator.as_mut()).await?;
        self.advance(RunState::ParametersCollected);

        countdown(self.config.countdown_tick()).await;
        generate(generator.as_mut(), parameters.clone()).await?;
        self.advance(RunState::Generated);

        self.print_usage(&target_path);
        self.advance(RunState::Done);

        Ok(RunSummary {
            target_path,
            source: resolved.source().clone(),
            template_name: self.template_name.clone(),
            parameters,
        })
    }

    fn ensure_fresh(&self) -> InitResult<()> {
        if self.state == RunState::Start {
            Ok(())
        } else {
            Err(InitError::AlreadyRun)
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(next > self.state, "run state must move forward");
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }

    fn remember_template_name(&mut self, name: &str) {
        if self.template_name.is_none() {
            self.template_name = Some(name.to_string());
        }
    }

    async fn resolve_source(
        &mut self,
        kind: SourceKind,
        catalog: &TemplateCatalog,
        cwd: &Path,
    ) -> InitResult<ResolvedSource> {
        let resolved = match kind {
            SourceKind::CatalogType(name) => ResolvedSource::from_catalog(catalog, &name)?,
            SourceKind::LocalPath(path) => ResolvedSource::from_local_path(&path, cwd),
            SourceKind::PackageName(identifier) => ResolvedSource::from_package(&identifier),
            SourceKind::Interactive => {
                self.set_prompt(selection_prompt(catalog));
                let choice = self.run_prompt().await?.into_text()?;
                ResolvedSource::from_choice(catalog, &choice)?
            }
        };

        if let Some(name) = resolved.template_name() {
            self.remember_template_name(name);
        }
        tracing::info!(source = %resolved.source(), "template source resolved");
        Ok(resolved)
    }

    async fn resolve_target_dir(&mut self, dir: Option<&Path>, cwd: &Path) -> InitResult<PathBuf> {
        if let Some(preset) = self.target_path.take() {
            let target_path = absolute_from(&preset, cwd);
            self.target_path = Some(target_path.clone());
            return Ok(target_path);
        }

        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => {
                self.set_prompt(PromptSpec::input(
                    DIR_MESSAGE,
                    Some(DEFAULT_TARGET_DIR.to_string()),
                ));
                PathBuf::from(self.run_prompt().await?.into_text()?)
            }
        };

        let target_path = absolute_from(&dir, cwd);
        tracing::info!(target = %target_path.display(), "target directory resolved");
        self.target_path = Some(target_path.clone());
        Ok(target_path)
    }

    fn bind(&self, source: &TemplateSource, target_path: &Path) -> Box<dyn GeneratorHandle> {
        match source {
            TemplateSource::LocalPath(path) => self.engine.define_local_path(path, target_path),
            TemplateSource::Package(identifier) => {
                self.engine
                    .define_package(&self.config.npm_client, identifier, target_path)
            }
        }
    }

    async fn collect_parameters(
        &mut self,
        generator: &mut dyn GeneratorHandle,
    ) -> InitResult<Option<Parameters>> {
        let schema = generator.parameter_schema().await?;
        let Some(spec) = form_prompt(&schema) else {
            tracing::debug!("template declares no parameters");
            return Ok(None);
        };

        self.set_prompt(spec);
        let parameters = self.run_prompt().await?.into_fields()?;
        tracing::debug!(count = parameters.len(), "parameters collected");
        Ok(Some(parameters))
    }

    /// Print the closing notice with next steps
    fn print_usage(&self, target_path: &Path) {
        let client = &self.config.npm_client;

        println!();
        println!("{}", style("✓ Project created successfully!").green().bold());
        if let Some(name) = &self.template_name {
            println!("  {} {}", style("Template:").dim(), style(name).cyan());
        }
        println!("  {} {}", style("Location:").dim(), style(target_path.display()).cyan());
        println!();
        println!("{}", style("Next steps:").bold());
        println!();
        println!("  {} Navigate to project:", style("1.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style(format!("cd {}", target_path.display())).cyan()
        );
        println!();
        println!("  {} Install dependencies:", style("2.").cyan());
        println!("     {} {}", style("$").dim(), style(format!("{client} install")).cyan());
        println!();
        println!("  {} Start development server:", style("3.").cyan());
        println!("     {} {}", style("$").dim(), style(format!("{client} run dev")).cyan());
        println!();
    }
}

/// Fixed announcement before generation
async fn countdown(tick: Duration) {
    println!();
    for label in COUNTDOWN {
        tokio::time::sleep(tick).await;
        println!("{}", style(label).cyan());
    }
}

/// Run the generator behind a spinner
async fn generate(
    generator: &mut dyn GeneratorHandle,
    parameters: Option<Parameters>,
) -> InitResult<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| InitError::generation(format!("failed to set progress style: {e}")))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Generating project files...");

    let result = generator.run(parameters).await;
    spinner.finish_and_clear();
    result
}
