//! Package publishing.
//!
//! Writes registry credentials, builds source and wheel distributions, and
//! uploads them. External programs are launched through [`CommandRunner`],
//! so the sequence can be exercised without spawning processes.

use acg_codegen::template_engine::{PYPIRC, Substitutions, TemplateEngine};
use acg_core::{Error, RegistryCredentials, Result};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Credentials file name in the home directory.
pub const PYPIRC_FILE: &str = ".pypirc";

/// Directory the build steps write distributions to.
pub const DIST_DIR: &str = "dist";

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishStep {
    /// Program to run
    pub program: String,
    /// Arguments, not shell-expanded
    pub args: Vec<String>,
}

impl PublishStep {
    /// Creates a step.
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Launches external programs.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs `step` with `dir` as working directory and returns its exit
    /// code, or `None` if it was terminated by a signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    fn run(&self, step: &PublishStep, dir: &Path) -> io::Result<Option<i32>>;
}

/// Runs steps as child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, step: &PublishStep, dir: &Path) -> io::Result<Option<i32>> {
        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(dir)
            .status()?;
        Ok(status.code())
    }
}

/// Steps that install the uploader and build distributions, in order.
#[must_use]
pub fn build_steps() -> Vec<PublishStep> {
    vec![
        PublishStep::new("pip", &["install", "twine"]),
        PublishStep::new("python", &["setup.py", "sdist"]),
        PublishStep::new("python", &["setup.py", "bdist_wheel"]),
    ]
}

/// Upload step for the given distribution files (relative to the package
/// directory).
#[must_use]
pub fn upload_step(distributions: &[String]) -> PublishStep {
    let mut step = PublishStep::new("twine", &["upload"]);
    step.args.extend(distributions.iter().cloned());
    step
}

/// Default credentials file location, `~/.pypirc`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_pypirc_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(PYPIRC_FILE))
        .ok_or_else(|| {
            Error::io(
                "locating home directory",
                io::Error::new(io::ErrorKind::NotFound, "home directory is not set"),
            )
        })
}

/// Renders the credentials file.
///
/// # Errors
///
/// Returns a template error if the `pypi/pypirc` template fails.
pub fn render_pypirc(engine: &TemplateEngine, credentials: &RegistryCredentials) -> Result<String> {
    let substitutions = Substitutions::new()
        .with("username", &credentials.username)
        .with("password", credentials.password().expose_secret());
    engine.render_template(PYPIRC, Some(&substitutions))
}

/// What a publish run did, or would do with `dry_run`.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// Package directory the steps ran in
    pub package_dir: String,
    /// Credentials file written
    pub pypirc: String,
    /// Command lines, in order
    pub steps: Vec<String>,
    /// `true` if nothing was executed
    pub dry_run: bool,
}

/// Publishes one generated package.
#[derive(Debug)]
pub struct PublishPipeline<'e, R> {
    runner: R,
    engine: &'e TemplateEngine,
    package_dir: PathBuf,
    pypirc_path: PathBuf,
}

impl<'e, R: CommandRunner> PublishPipeline<'e, R> {
    /// Creates a pipeline for the package at `package_dir`.
    #[must_use]
    pub fn new(
        runner: R,
        engine: &'e TemplateEngine,
        package_dir: impl Into<PathBuf>,
        pypirc_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            engine,
            package_dir: package_dir.into(),
            pypirc_path: pypirc_path.into(),
        }
    }

    /// Steps as they would run, with the upload listed as `dist/*`.
    #[must_use]
    pub fn planned_steps(&self) -> Vec<PublishStep> {
        let mut steps = build_steps();
        steps.push(upload_step(&[format!("{DIST_DIR}/*")]));
        steps
    }

    /// Describes the run without touching the filesystem or spawning
    /// anything.
    #[must_use]
    pub fn dry_run(&self) -> PublishReport {
        self.report(self.planned_steps(), true)
    }

    /// Writes credentials, runs the build steps, and uploads every file in
    /// `dist/`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::Io`] if the package directory has no `setup.py` or the
    ///   credentials file cannot be written
    /// - [`Error::PublishStepFailed`] for the first step that cannot start
    ///   or exits non-zero, or if the build produced no distributions
    pub fn run(&self, credentials: &RegistryCredentials) -> Result<PublishReport> {
        if !self.package_dir.join("setup.py").is_file() {
            return Err(Error::io(
                format!("opening package {}", self.package_dir.display()),
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "setup.py not found, generate the package first",
                ),
            ));
        }

        self.write_pypirc(credentials)?;

        let mut executed = Vec::new();
        for step in build_steps() {
            self.execute(&step)?;
            executed.push(step);
        }

        let distributions = self.distributions()?;
        if distributions.is_empty() {
            return Err(Error::PublishStepFailed {
                step: upload_step(&[]).to_string(),
                status: format!("no distributions found in {DIST_DIR}/"),
            });
        }

        let upload = upload_step(&distributions);
        self.execute(&upload)?;
        executed.push(upload);

        tracing::info!(
            "Published package from {} ({} distributions)",
            self.package_dir.display(),
            distributions.len()
        );
        Ok(self.report(executed, false))
    }

    fn write_pypirc(&self, credentials: &RegistryCredentials) -> Result<()> {
        let content = render_pypirc(self.engine, credentials)?;
        let context = || format!("writing {}", self.pypirc_path.display());

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.pypirc_path)
            .map_err(|e| Error::io(context(), e))?;
        // `mode` only applies when the file is created
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::io(context(), e))?;
        }
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io(context(), e))?;

        tracing::info!("Wrote registry credentials to {}", self.pypirc_path.display());
        Ok(())
    }

    fn execute(&self, step: &PublishStep) -> Result<()> {
        tracing::info!("Running: {step}");

        let failed = |status: String| Error::PublishStepFailed {
            step: step.to_string(),
            status,
        };

        match self.runner.run(step, &self.package_dir) {
            Ok(Some(0)) => Ok(()),
            Ok(Some(code)) => Err(failed(format!("exit code {code}"))),
            Ok(None) => Err(failed("terminated by signal".to_string())),
            Err(e) => Err(failed(format!("failed to start: {e}"))),
        }
    }

    /// Files in `dist/`, sorted, relative to the package directory.
    fn distributions(&self) -> Result<Vec<String>> {
        let dist = self.package_dir.join(DIST_DIR);
        if !dist.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&dist).map_err(|e| Error::io(format!("listing {}", dist.display()), e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(format!("listing {}", dist.display()), e))?;
            if entry.path().is_file() {
                files.push(format!("{DIST_DIR}/{}", entry.file_name().to_string_lossy()));
            }
        }
        files.sort();
        Ok(files)
    }

    fn report(&self, steps: Vec<PublishStep>, dry_run: bool) -> PublishReport {
        PublishReport {
            package_dir: self.package_dir.display().to_string(),
            pypirc: self.pypirc_path.display().to_string(),
            steps: steps.iter().map(ToString::to_string).collect(),
            dry_run,
        }
    }
}
