//! Integration tests for the init command

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use midway_init::{
    FormField, GeneratorEngine, GeneratorHandle, InitCommand, InitConfig, InitError, InitResult,
    ParameterSchema, ParameterSpec, Parameters, PromptSpec, Prompter, RunState, SubmitHook,
    TemplateSource,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Prompter answering from a script, falling back to defaults
struct ScriptedPrompter {
    log: Log,
    answers: Mutex<VecDeque<String>>,
    seen_defaults: Mutex<Vec<Option<String>>>,
}

impl ScriptedPrompter {
    fn new(log: &Log, answers: &[&str]) -> Self {
        Self {
            log: Arc::clone(log),
            answers: Mutex::new(answers.iter().map(ToString::to_string).collect()),
            seen_defaults: Mutex::default(),
        }
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn select(
        &self,
        message: &str,
        choices: &[String],
        default: usize,
        _visible: bool,
    ) -> InitResult<String> {
        self.log.lock().push(format!("select:{message}"));
        Ok(self
            .answers
            .lock()
            .pop_front()
            .unwrap_or_else(|| choices[default].clone()))
    }

    async fn input(
        &self,
        message: &str,
        default: Option<&str>,
        _visible: bool,
    ) -> InitResult<String> {
        self.log.lock().push(format!("input:{message}"));
        self.seen_defaults.lock().push(default.map(str::to_string));
        Ok(self
            .answers
            .lock()
            .pop_front()
            .unwrap_or_else(|| default.unwrap_or_default().to_string()))
    }

    async fn form(
        &self,
        message: &str,
        fields: &[FormField],
        _visible: bool,
    ) -> InitResult<Parameters> {
        self.log.lock().push(format!("form:{message}"));
        Ok(fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect())
    }
}

struct LoggingHook {
    log: Log,
    fail: bool,
}

#[async_trait]
impl SubmitHook for LoggingHook {
    async fn before_submit(&self, spec: &PromptSpec) -> InitResult<()> {
        self.log.lock().push(format!("hook:{}", spec.kind_name()));
        if self.fail {
            return Err(InitError::PromptAborted("hook refused".to_string()));
        }
        Ok(())
    }
}

/// What the fake engine saw
#[derive(Debug, Default)]
struct Bound {
    source: Option<TemplateSource>,
    target: Option<PathBuf>,
    npm_client: Option<String>,
    runs: Vec<Option<Parameters>>,
}

struct FakeHandle {
    source: TemplateSource,
    target: PathBuf,
    schema: ParameterSchema,
    bound: Arc<Mutex<Bound>>,
}

#[async_trait]
impl GeneratorHandle for FakeHandle {
    fn source(&self) -> &TemplateSource {
        &self.source
    }

    fn target(&self) -> &Path {
        &self.target
    }

    async fn parameter_schema(&mut self) -> InitResult<ParameterSchema> {
        Ok(self.schema.clone())
    }

    async fn run(&mut self, parameters: Option<Parameters>) -> InitResult<()> {
        self.bound.lock().runs.push(parameters);
        Ok(())
    }
}

#[derive(Default)]
struct FakeEngine {
    schema: ParameterSchema,
    bound: Arc<Mutex<Bound>>,
}

impl FakeEngine {
    fn handle(&self, source: TemplateSource, target: &Path) -> Box<dyn GeneratorHandle> {
        let mut bound = self.bound.lock();
        bound.source = Some(source.clone());
        bound.target = Some(target.to_path_buf());
        Box::new(FakeHandle {
            source,
            target: target.to_path_buf(),
            schema: self.schema.clone(),
            bound: Arc::clone(&self.bound),
        })
    }
}

impl GeneratorEngine for FakeEngine {
    fn define_local_path(&self, template_path: &Path, target_path: &Path) -> Box<dyn GeneratorHandle> {
        self.handle(TemplateSource::LocalPath(template_path.to_path_buf()), target_path)
    }

    fn define_package(
        &self,
        npm_client: &str,
        identifier: &str,
        target_path: &Path,
    ) -> Box<dyn GeneratorHandle> {
        self.bound.lock().npm_client = Some(npm_client.to_string());
        self.handle(TemplateSource::Package(identifier.to_string()), target_path)
    }
}

fn quick_config() -> InitConfig {
    InitConfig {
        countdown_tick_ms: 0,
        ..InitConfig::default()
    }
}

struct Harness {
    log: Log,
    prompter: Arc<ScriptedPrompter>,
    engine: Arc<FakeEngine>,
    command: InitCommand,
}

fn harness(answers: &[&str], schema: ParameterSchema, failing_hook: bool) -> Harness {
    let log: Log = Arc::default();
    let prompter = Arc::new(ScriptedPrompter::new(&log, answers));
    let engine = Arc::new(FakeEngine {
        schema,
        bound: Arc::default(),
    });
    let hook = Arc::new(LoggingHook {
        log: Arc::clone(&log),
        fail: failing_hook,
    });
    let command = InitCommand::new(quick_config())
        .with_prompter(Arc::clone(&prompter) as Arc<dyn Prompter>)
        .with_engine(Arc::clone(&engine) as Arc<dyn GeneratorEngine>)
        .with_hook(hook);
    Harness {
        log,
        prompter,
        engine,
        command,
    }
}

fn name_schema() -> ParameterSchema {
    ParameterSchema::new(vec![ParameterSpec {
        name: "name".to_string(),
        description: "Project name".to_string(),
        default: "demo".to_string(),
    }])
}

#[tokio::test]
async fn test_catalog_type_skips_source_prompt() {
    let mut h = harness(&[], ParameterSchema::default(), false);

    let summary = h
        .command
        .run(Path::new("/work"), ["midway-init", "--type", "web", "--dir", "app"])
        .await
        .unwrap();

    assert_eq!(
        summary.source,
        TemplateSource::Package("midway-boilerplate-web".to_string())
    );
    assert_eq!(h.command.template_name(), Some("web"));
    assert!(h.log.lock().iter().all(|entry| !entry.starts_with("select")));
    assert_eq!(h.engine.bound.lock().npm_client.as_deref(), Some("npm"));
}

#[tokio::test]
async fn test_unknown_type_fails_before_binding() {
    let mut h = harness(&[], ParameterSchema::default(), false);

    let result = h
        .command
        .run(Path::new("/work"), ["midway-init", "--type", "spring"])
        .await;

    assert!(matches!(result, Err(InitError::UnknownTemplate { ref name, .. }) if name == "spring"));
    assert!(h.engine.bound.lock().source.is_none());
    assert!(h.log.lock().is_empty());
    assert_eq!(h.command.state(), RunState::CatalogLoaded);
}

#[tokio::test]
async fn test_local_template_is_made_absolute() {
    let mut h = harness(&[], ParameterSchema::default(), false);
    h.command
        .run(Path::new("/work"), ["midway-init", "--template", "./foo", "--dir", "app"])
        .await
        .unwrap();
    assert_eq!(
        h.engine.bound.lock().source,
        Some(TemplateSource::LocalPath(PathBuf::from("/work/foo")))
    );
    assert_eq!(h.command.template_name(), None);

    let mut h = harness(&[], ParameterSchema::default(), false);
    h.command
        .run(Path::new("/work"), ["midway-init", "--template", "/abs/foo", "--dir", "app"])
        .await
        .unwrap();
    assert_eq!(
        h.engine.bound.lock().source,
        Some(TemplateSource::LocalPath(PathBuf::from("/abs/foo")))
    );
}

#[tokio::test]
async fn test_directory_prompt_defaults_to_my_midway_app() {
    let mut h = harness(&[], ParameterSchema::default(), false);

    let summary = h
        .command
        .run(Path::new("/work"), ["midway-init", "--package", "custom-tpl"])
        .await
        .unwrap();

    assert_eq!(
        *h.prompter.seen_defaults.lock(),
        vec![Some("my_midway_app".to_string())]
    );
    assert_eq!(summary.target_path, PathBuf::from("/work/my_midway_app"));
    assert_eq!(
        h.engine.bound.lock().target,
        Some(PathBuf::from("/work/my_midway_app"))
    );
}

#[tokio::test]
async fn test_empty_schema_runs_without_parameters() {
    let mut h = harness(&[], ParameterSchema::default(), false);

    let summary = h
        .command
        .run(Path::new("/work"), ["midway-init", "--package", "p", "--dir", "app"])
        .await
        .unwrap();

    assert!(h.log.lock().iter().all(|entry| !entry.starts_with("form")));
    assert_eq!(h.engine.bound.lock().runs, vec![None]);
    assert_eq!(summary.parameters, None);
    assert_eq!(h.command.state(), RunState::Done);
}

#[tokio::test]
async fn test_declared_parameters_use_defaults() {
    let mut h = harness(&[], name_schema(), false);

    h.command
        .run(Path::new("/work"), ["midway-init", "--package", "p", "--dir", "app"])
        .await
        .unwrap();

    let expected: Parameters = [("name".to_string(), "demo".to_string())]
        .into_iter()
        .collect();
    assert_eq!(h.engine.bound.lock().runs, vec![Some(expected)]);
}

#[tokio::test]
async fn test_interactive_flow_hooks_every_prompt() {
    let mut h = harness(&["koa - koa boilerplate", "here"], name_schema(), false);

    let summary = h
        .command
        .run(Path::new("/work"), ["midway-init"])
        .await
        .unwrap();

    assert_eq!(h.command.template_name(), Some("koa"));
    assert_eq!(summary.target_path, PathBuf::from("/work/here"));

    let log = h.log.lock();
    let kinds: Vec<&str> = log
        .iter()
        .map(|entry| entry.split(':').next().unwrap_or_default())
        .collect();
    assert_eq!(
        kinds,
        vec!["hook", "select", "hook", "input", "hook", "form"]
    );
}

#[tokio::test]
async fn test_failing_hook_aborts_run() {
    let mut h = harness(&[], ParameterSchema::default(), true);

    let result = h
        .command
        .run(Path::new("/work"), ["midway-init", "--package", "p"])
        .await;

    assert!(matches!(result, Err(InitError::PromptAborted(_))));
    assert_eq!(*h.log.lock(), vec!["hook:input".to_string()]);
    assert!(h.engine.bound.lock().source.is_none());
}

#[tokio::test]
async fn test_unknown_flag_is_argument_error() {
    let mut h = harness(&[], ParameterSchema::default(), false);
    let result = h
        .command
        .run(Path::new("/work"), ["midway-init", "--bogus"])
        .await;
    assert!(matches!(result, Err(InitError::Arguments(_))));
    assert_eq!(h.command.state(), RunState::Start);
}

#[tokio::test]
async fn test_local_template_end_to_end() {
    let template = TempDir::new().unwrap();
    fs::write(
        template.path().join("package.json"),
        r#"{"name": "tpl", "boilerplateConfig": {"parameters": {"name": {"desc": "Project name", "default": "demo"}}}}"#,
    )
    .unwrap();
    let files = template.path().join("boilerplate");
    fs::create_dir_all(files.join("src")).unwrap();
    fs::write(files.join("_gitignore"), "node_modules\n").unwrap();
    fs::write(files.join("src/index.ts"), "export const app = '{{name}}';\n").unwrap();

    let workspace = TempDir::new().unwrap();
    let template_arg = template.path().display().to_string();
    let mut command = InitCommand::new(quick_config());

    let summary = command
        .run(
            workspace.path(),
            ["midway-init", "--template", template_arg.as_str(), "--dir", "app", "--yes"],
        )
        .await
        .unwrap();

    let app = workspace.path().join("app");
    assert_eq!(summary.target_path, app);
    assert_eq!(
        fs::read_to_string(app.join("src/index.ts")).unwrap(),
        "export const app = 'demo';\n"
    );
    assert!(app.join(".gitignore").is_file());
    assert!(!app.join("_gitignore").exists());
}

#[tokio::test]
async fn test_relative_catalog_resolves_against_cwd() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("templates.json"),
        r#"{"internal": {"description": "in-house starter", "package": "@corp/starter"}}"#,
    )
    .unwrap();
    let mut h = harness(&[], ParameterSchema::default(), false);

    let summary = h
        .command
        .run(
            workspace.path(),
            ["midway-init", "--catalog", "templates.json", "--type", "internal", "--dir", "app"],
        )
        .await
        .unwrap();

    assert_eq!(
        summary.source,
        TemplateSource::Package("@corp/starter".to_string())
    );
    assert_eq!(summary.template_name.as_deref(), Some("internal"));
}
