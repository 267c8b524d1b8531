//! Running the subgraph's `codegen` script after an add.

use std::path::Path;

use anyhow::{bail, Result};

use crate::util::process::{PackageManager, ProcessBuilder};

/// Run `codegen` in `project_root` with the first available package manager.
///
/// `preferred` is tried first, then yarn, then npm.
pub fn run_codegen(project_root: &Path, preferred: Option<PackageManager>) -> Result<PackageManager> {
    let Some((pm, program)) = PackageManager::detect(preferred) else {
        bail!("neither yarn nor npm was found in PATH; cannot run `codegen`");
    };

    let cmd = ProcessBuilder::new(program)
        .args(pm.codegen_args())
        .cwd(project_root);

    tracing::debug!("running `{}` in {}", cmd.display_command(), project_root.display());
    let output = cmd.exec_and_check()?;
    tracing::debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());

    Ok(pm)
}
