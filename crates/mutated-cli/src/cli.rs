//! Command line
//!
//! Built with the clap builder API; [`Settings`] is the typed view of the
//! parsed arguments.

use crate::input::Source;
use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mutated_ownership::{Classifier, ClassifierRules, OwnershipResolver};
use mutated_render::{LabelSelector, Marker, OutputFormat, PrintOptions};
use std::path::PathBuf;

/// Command definition for `kubectl-mutated`
#[must_use]
pub fn command() -> Command {
    let formats = OutputFormat::ALL
        .iter()
        .map(|format| format!("{format}: {}", format.description()))
        .collect::<Vec<_>>()
        .join("; ");

    Command::new("kubectl-mutated")
        .version(crate::VERSION)
        .about("Show resource fields set only by manually-operated field managers")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value("table")
                .value_parser(|s: &str| s.parse::<OutputFormat>())
                .help(format!("Output format ({formats})")),
        )
        .arg(
            Arg::new("all-namespaces")
                .short('A')
                .long("all-namespaces")
                .action(ArgAction::SetTrue)
                .help("Resources come from all namespaces: show and keep their namespace"),
        )
        .arg(
            Arg::new("namespace")
                .short('n')
                .long("namespace")
                .value_name("NAMESPACE")
                .help("Only consider resources in this namespace"),
        )
        .arg(
            Arg::new("selector")
                .short('l')
                .long("selector")
                .value_name("SELECTOR")
                .value_parser(|s: &str| s.parse::<LabelSelector>())
                .help("Label selector (k=v, k!=v, k, !k; comma separated)"),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Classifier rules (.yaml, .yml or .toml)"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Mark highlighted fields with « » instead of terminal styles"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .action(ArgAction::Append)
                .help("YAML or JSON resource files; '-' or none reads stdin"),
        )
}

/// Parsed arguments
#[derive(Debug, Clone)]
pub struct Settings {
    /// Output format
    pub format: OutputFormat,
    /// Printer options
    pub options: PrintOptions,
    /// Namespace filter
    pub namespace: Option<String>,
    /// Label filter
    pub selector: LabelSelector,
    /// Classifier rules file
    pub rules: Option<PathBuf>,
    /// Inputs in command-line order
    pub sources: Vec<Source>,
}

impl Settings {
    /// Typed settings from matches of [`command`]
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let marker = if matches.get_flag("no-color") {
            Marker::PLAIN
        } else {
            Marker::Styled
        };
        let mut sources: Vec<Source> = matches
            .get_many::<String>("files")
            .into_iter()
            .flatten()
            .map(|arg| Source::from_arg(arg))
            .collect();
        if sources.is_empty() {
            sources.push(Source::Stdin);
        }

        Self {
            format: matches
                .get_one::<OutputFormat>("output")
                .copied()
                .unwrap_or_default(),
            options: PrintOptions {
                all_namespaces: matches.get_flag("all-namespaces"),
                marker,
            },
            namespace: matches.get_one::<String>("namespace").cloned(),
            selector: matches
                .get_one::<LabelSelector>("selector")
                .cloned()
                .unwrap_or_default(),
            rules: matches.get_one::<PathBuf>("rules").cloned(),
            sources,
        }
    }

    /// Resolver over the configured classifier rules
    ///
    /// # Errors
    /// Fails if the rules file cannot be loaded
    pub fn resolver(&self) -> Result<OwnershipResolver> {
        let rules = match &self.rules {
            Some(path) => ClassifierRules::load(path)
                .with_context(|| format!("loading classifier rules from {}", path.display()))?,
            None => ClassifierRules::default(),
        };
        Ok(OwnershipResolver::new(Classifier::new(rules)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings(args: &[&str]) -> Settings {
        let argv = std::iter::once("kubectl-mutated").chain(args.iter().copied());
        Settings::from_matches(&command().try_get_matches_from(argv).unwrap())
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn defaults() {
        let settings = settings(&[]);
        assert_eq!(settings.format, OutputFormat::Table);
        assert!(!settings.options.all_namespaces);
        assert_eq!(settings.options.marker, Marker::Styled);
        assert!(settings.selector.is_empty());
        assert_eq!(settings.sources, vec![Source::Stdin]);
    }

    #[test]
    fn all_flags() {
        let settings = settings(&[
            "-o", "hyaml", "-A", "-n", "prod", "-l", "app=web", "--no-color", "a.yaml", "-",
        ]);
        assert_eq!(settings.format, OutputFormat::HighlightedYaml);
        assert!(settings.options.all_namespaces);
        assert_eq!(settings.options.marker, Marker::PLAIN);
        assert_eq!(settings.namespace.as_deref(), Some("prod"));
        assert!(!settings.selector.is_empty());
        assert_eq!(
            settings.sources,
            vec![Source::File(PathBuf::from("a.yaml")), Source::Stdin]
        );
    }

    #[test]
    fn unknown_output_format() {
        let err = command()
            .try_get_matches_from(["kubectl-mutated", "-o", "wide"])
            .unwrap_err();
        assert!(err.to_string().contains("unrecognized printer: wide"));
    }

    #[test]
    fn rules_file_is_loaded() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "manual_exact_names: [\"argocd-cli\"]").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let resolver = settings(&["--rules", path.as_str()]).resolver().unwrap();
        assert!(resolver.classifier().is_manual("argocd-cli"));
        assert!(resolver.classifier().is_manual("kubectl-edit"));
    }

    #[test]
    fn missing_rules_file() {
        let err = settings(&["--rules", "/nonexistent/rules.yaml"])
            .resolver()
            .unwrap_err();
        assert!(format!("{err:#}").contains("loading classifier rules"));
    }
}
