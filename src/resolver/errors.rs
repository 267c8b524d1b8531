//! Error types of the add operation.
//!
//! Every variant aborts the whole operation before anything is written.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Failure of an add operation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum AddError {
    #[error("missing required input: {what}")]
    #[diagnostic(code(graft::add::missing_input))]
    MissingInput { what: String },

    #[error("`{address}` is not a valid contract address")]
    #[diagnostic(
        code(graft::add::invalid_address),
        help("Addresses are `0x` followed by 40 hexadecimal digits")
    )]
    InvalidAddress { address: String },

    #[error("entity `{alias}` of contract `{contract}` collides with an existing entity, and `{renamed}` is already taken")]
    #[diagnostic(
        code(graft::add::name_collision),
        help("Pick a different `--contract-name`")
    )]
    NameCollision {
        contract: String,
        alias: String,
        renamed: String,
    },

    #[error("{what} `{value}` of contract `{contract}` is already used by `{owner}`")]
    #[diagnostic(
        code(graft::add::artifact_in_use),
        help("Pick a different `--contract-name`")
    )]
    ArtifactInUse {
        contract: String,
        what: String,
        value: String,
        owner: String,
    },

    #[error("contract `{contract}` declares event `{alias}` more than once")]
    #[diagnostic(code(graft::add::duplicate_alias))]
    DuplicateAlias { contract: String, alias: String },

    #[error("invalid ABI for `{contract}`: {reason}")]
    #[diagnostic(code(graft::add::invalid_abi))]
    InvalidAbi { contract: String, reason: String },

    #[error("{protocol} template rendered invalid manifest YAML: {message}")]
    #[diagnostic(code(graft::add::template_render))]
    TemplateRender {
        protocol: String,
        raw: String,
        message: String,
    },

    #[error("invalid manifest: {reason}")]
    #[diagnostic(code(graft::add::invalid_manifest))]
    InvalidManifest { reason: String },

    #[error("failed to fetch ABI for `{address}` on {network}: {message}")]
    #[diagnostic(
        code(graft::add::fetch),
        help("Pass the ABI explicitly with `--abi <path>`")
    )]
    ExternalFetch {
        network: String,
        address: String,
        message: String,
    },

    #[error("data source kind `{kind}` is not supported")]
    #[diagnostic(code(graft::add::unsupported_protocol))]
    UnsupportedProtocol { kind: String },
}

impl AddError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AddError::MissingInput { what } => Diagnostic::error(format!("no {} provided", what))
                .with_suggestion(suggestions::ADD_USAGE),

            AddError::InvalidAddress { address } => {
                Diagnostic::error(format!("`{}` is not a valid contract address", address))
                    .with_context("expected `0x` followed by 40 hexadecimal digits")
            }

            AddError::NameCollision {
                contract,
                alias,
                renamed,
            } => Diagnostic::error(format!(
                "cannot add entity `{}` for contract `{}`",
                alias, contract
            ))
            .with_context(format!("`{}` is already declared in the manifest", alias))
            .with_context(format!(
                "`{}` is already declared in the manifest as well",
                renamed
            ))
            .with_suggestion("Choose another name with `--contract-name <name>`")
            .with_suggestion(format!(
                "Rename or remove the existing `{}` entity",
                renamed
            )),

            AddError::ArtifactInUse {
                contract,
                what,
                value,
                owner,
            } => Diagnostic::error(format!("cannot add contract `{}`", contract))
                .with_context(format!("{} `{}` is already used by `{}`", what, value, owner))
                .with_context(format!("adding it would overwrite the files of `{}`", owner))
                .with_suggestion("Choose another name with `--contract-name <name>`"),

            AddError::DuplicateAlias { contract, alias } => Diagnostic::error(format!(
                "contract `{}` declares event `{}` more than once",
                contract, alias
            ))
            .with_context("two events resolve to the same entity name")
            .with_suggestion("Remove the duplicated event from the ABI"),

            AddError::InvalidAbi { contract, reason } => {
                Diagnostic::error(format!("invalid ABI for `{}`", contract)).with_context(reason)
            }

            AddError::TemplateRender {
                protocol,
                raw,
                message,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "{} template rendered invalid manifest YAML",
                    protocol
                ))
                .with_context(message.clone());
                for line in raw.lines().filter(|l| !l.trim().is_empty()) {
                    diag = diag.with_context(format!("| {}", line));
                }
                diag
            }

            AddError::InvalidManifest { reason } => {
                Diagnostic::error(format!("invalid manifest: {}", reason))
            }

            AddError::ExternalFetch {
                network,
                address,
                message,
            } => Diagnostic::error(format!(
                "failed to fetch ABI for `{}` on {}",
                address, network
            ))
            .with_context(message.clone())
            .with_suggestion("Pass the ABI explicitly with `--abi <path>`")
            .with_suggestion(suggestions::FETCH_FAILED),

            AddError::UnsupportedProtocol { kind } => {
                Diagnostic::error(format!("data source kind `{}` is not supported", kind))
                    .with_context("supported kinds: ethereum, ethereum/contract")
            }
        }
    }
}
