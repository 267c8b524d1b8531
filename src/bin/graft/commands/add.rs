//! `graft add` command

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};

use crate::cli::AddArgs;
use graft::core::YamlManifestStore;
use graft::ops::{add_data_source, run_codegen, AddOptions, AddResult, MergeMode};
use graft::resolver::AddError;
use graft::sources::{AbiSource, EtherscanSource, PathSource};
use graft::util::diagnostic::suggestions;
use graft::util::shell::{Shell, Status};
use graft::GlobalContext;

pub fn execute(args: AddArgs, ctx: &GlobalContext, shell: &Arc<Shell>) -> Result<()> {
    let address = args.address.clone().ok_or_else(|| AddError::MissingInput {
        what: "contract address".to_string(),
    })?;

    let manifest_path = ctx.manifest_path(args.manifest.as_deref());
    if !manifest_path.is_file() {
        bail!(
            "could not find manifest `{}`\nhelp: {}",
            manifest_path.display(),
            suggestions::NO_MANIFEST
        );
    }
    let root = ctx.project_root(&manifest_path);

    let mut config = ctx.load_config(&manifest_path);
    if args.etherscan_api_key.is_some() {
        config.explorer.api_key = args.etherscan_api_key.clone();
    }

    let opts = to_options(&args, address);

    let source: Box<dyn AbiSource> = match args.abi {
        Some(ref path) => Box::new(PathSource::new(ctx.cwd().join(path))),
        None => Box::new(EtherscanSource::new(&config.explorer)),
    };

    let span = args.abi.is_none().then(|| {
        shell.span(
            Status::Fetching,
            format!("ABI of `{}` ({})", opts.contract_name, opts.address),
        )
    });
    let result = add_data_source(
        &manifest_path,
        &opts,
        source.as_ref(),
        &YamlManifestStore,
        &config,
    );
    drop(span);
    let result = result?;

    report(shell, &result, &root);

    if args.skip_codegen {
        shell.status(Status::Skipped, "codegen (--skip-codegen)");
        return Ok(());
    }

    let span = shell.span(Status::Generating, "types with `codegen`");
    let pm = run_codegen(&root, config.scaffold.package_manager)
        .map_err(|e| anyhow!("{:#}\nhelp: {}", e, suggestions::CODEGEN_FAILED))?;
    span.finish_with_message(format!("codegen ({})", pm.program()));

    Ok(())
}

fn to_options(args: &AddArgs, address: String) -> AddOptions {
    AddOptions {
        address,
        contract_name: args.contract_name.clone(),
        network: args.network.clone(),
        merge_entities: args.merge_entities,
        index_events: args.index_events,
    }
}

fn report(shell: &Shell, result: &AddResult, root: &Path) {
    for rename in &result.renames {
        shell.status(
            Status::Renamed,
            format!(
                "entity `{}` to `{}` (name already in use)",
                rename.from, rename.to
            ),
        );
    }

    for path in &result.written {
        let shown = path.strip_prefix(root).unwrap_or(path);
        shell.status(Status::Writing, shown.display());
    }

    match result.mode {
        MergeMode::Appended => shell.status(
            Status::Added,
            format!("data source `{}` ({})", result.data_source, result.network),
        ),
        MergeMode::Merged { ref into } => shell.status(
            Status::Merged,
            format!(
                "data source `{}` ({}) into the entities of `{}`",
                result.data_source, result.network, into
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Helper to parse AddArgs from command-line strings.
    fn parse_add_args(args: &[&str]) -> AddArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            add: AddArgs,
        }
        let cli = TestCli::parse_from(args);
        cli.add
    }

    const ADDRESS: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";

    #[test]
    fn test_add_args_defaults() {
        let args = parse_add_args(&["test", ADDRESS]);

        assert_eq!(args.address.as_deref(), Some(ADDRESS));
        assert!(args.manifest.is_none());
        assert!(args.abi.is_none());
        assert_eq!(args.contract_name, "Contract");
        assert!(!args.merge_entities);
        assert!(args.index_events);
        assert!(args.network.is_none());
        assert!(!args.skip_codegen);
    }

    #[test]
    fn test_add_args_address_is_optional_for_clap() {
        let args = parse_add_args(&["test"]);
        assert!(args.address.is_none());
    }

    #[test]
    fn test_add_args_manifest_path() {
        let args = parse_add_args(&["test", ADDRESS, "sub/subgraph.yaml"]);
        assert_eq!(
            args.manifest.as_deref(),
            Some(Path::new("sub/subgraph.yaml"))
        );
    }

    #[test]
    fn test_add_args_all_options() {
        let args = parse_add_args(&[
            "test",
            ADDRESS,
            "--abi",
            "./abis/Token.json",
            "--contract-name",
            "Token",
            "--merge-entities",
            "--network",
            "sepolia",
            "--skip-codegen",
        ]);

        assert_eq!(args.abi.as_deref(), Some(Path::new("./abis/Token.json")));
        assert_eq!(args.contract_name, "Token");
        assert!(args.merge_entities);
        assert_eq!(args.network.as_deref(), Some("sepolia"));
        assert!(args.skip_codegen);
    }

    #[test]
    fn test_index_events_flag_forms() {
        assert!(parse_add_args(&["test", ADDRESS, "--index-events"]).index_events);
        assert!(parse_add_args(&["test", ADDRESS, "--index-events=true"]).index_events);
        assert!(!parse_add_args(&["test", ADDRESS, "--index-events=false"]).index_events);
    }

    #[test]
    fn test_bare_index_events_keeps_positionals() {
        let args = parse_add_args(&["test", "--index-events", ADDRESS, "sub/subgraph.yaml"]);

        assert!(args.index_events);
        assert_eq!(args.address.as_deref(), Some(ADDRESS));
        assert_eq!(
            args.manifest.as_deref(),
            Some(Path::new("sub/subgraph.yaml"))
        );
    }

    #[test]
    fn test_add_options_from_args() {
        let args = parse_add_args(&[
            "test",
            ADDRESS,
            "--contract-name",
            "Vault",
            "--index-events=false",
        ]);

        let opts = to_options(&args, ADDRESS.to_string());

        assert_eq!(opts.address, ADDRESS);
        assert_eq!(opts.contract_name, "Vault");
        assert!(!opts.index_events);
        assert!(!opts.merge_entities);
        assert!(opts.network.is_none());
    }
}
