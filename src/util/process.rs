//! Subprocess execution for the subgraph's package scripts.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Builder for a captured, non-interactive subprocess.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        self
    }

    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Run to completion with stdin closed and both output streams captured.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))
    }

    /// Like [`exec`](Self::exec), but a non-zero exit is an error carrying
    /// the captured output.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if output.status.success() {
            return Ok(output);
        }

        let code = match output.status.code() {
            Some(code) => code.to_string(),
            None => "none (killed by signal)".to_string(),
        };
        bail!(
            "`{}` failed with exit code {}\n{}{}",
            self.display_command(),
            code,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    pub fn display_command(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// JavaScript package manager used to run the subgraph's scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Arguments that run the `codegen` script.
    pub fn codegen_args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Yarn => &["codegen"],
            PackageManager::Npm => &["run", "codegen"],
        }
    }

    /// Pick an installed package manager, trying `preferred` first and then
    /// yarn before npm.
    pub fn detect(preferred: Option<PackageManager>) -> Option<(PackageManager, PathBuf)> {
        preferred
            .into_iter()
            .chain([PackageManager::Yarn, PackageManager::Npm])
            .find_map(|pm| find_executable(pm.program()).map(|path| (pm, path)))
    }
}
