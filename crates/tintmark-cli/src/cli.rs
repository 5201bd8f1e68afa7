//! Argument definitions
//!
//! Built with the clap builder API; [`Invocation::from_matches`] turns the
//! raw matches into typed arguments.

use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tintmark_engine::{parse_attribute_assignment, AnnotationConfig};
use tintmark_xml::SerializeOptions;

/// Report rendering on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// One summary line
    #[default]
    Text,
    /// Full per-candidate report as JSON
    Json,
}

/// Flag overrides applied on top of the loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--candidate-tag`
    pub candidate_tag: Option<String>,
    /// `--property-tag`
    pub property_tag: Option<String>,
    /// `--marker-tag` (`Some(Some(_))`) or `--no-marker` (`Some(None)`)
    pub marker_tag: Option<Option<String>>,
    /// `--attr K=V`, in order; replaces the configured set when non-empty
    pub attributes: Vec<(String, String)>,
    /// `--no-create`
    pub no_create: bool,
}

impl Overrides {
    /// Apply overrides to `config`
    #[must_use]
    pub fn apply(&self, mut config: AnnotationConfig) -> AnnotationConfig {
        if let Some(tag) = &self.candidate_tag {
            config.candidate_tag.clone_from(tag);
        }
        if let Some(tag) = &self.property_tag {
            config.property_tag.clone_from(tag);
        }
        if let Some(marker) = &self.marker_tag {
            config.marker_tag.clone_from(marker);
        }
        if !self.attributes.is_empty() {
            config.attributes = self.attributes.iter().cloned().collect();
        }
        if self.no_create {
            config.create_missing = false;
        }
        config
    }
}

/// Arguments of `tintmark annotate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateArgs {
    /// Input document
    pub source: PathBuf,
    /// Output document; nothing is written when absent
    pub target: Option<PathBuf>,
    /// Optional TOML configuration
    pub config: Option<PathBuf>,
    /// Flag overrides
    pub overrides: Overrides,
    /// Output formatting
    pub output: SerializeOptions,
    /// Report format
    pub report: ReportFormat,
    /// Do not print the document to stdout
    pub quiet: bool,
}

impl AnnotateArgs {
    /// Arguments for `source` with every option at its default
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: None,
            config: None,
            overrides: Overrides::default(),
            output: SerializeOptions::default(),
            report: ReportFormat::default(),
            quiet: false,
        }
    }
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `tintmark annotate ...`
    Annotate(AnnotateArgs),
    /// `tintmark show-config [--config <toml>]`
    ShowConfig {
        /// Optional TOML configuration
        config: Option<PathBuf>,
    },
}

impl Invocation {
    /// Extract the typed invocation from clap matches
    ///
    /// # Errors
    /// Fails when no subcommand was given
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        match matches.subcommand() {
            Some(("annotate", args)) => Ok(Self::Annotate(annotate_args(args))),
            Some(("show-config", args)) => Ok(Self::ShowConfig {
                config: args.get_one::<PathBuf>("config").cloned(),
            }),
            _ => Err(anyhow!("no command given; see `tintmark --help`")),
        }
    }
}

fn annotate_args(args: &ArgMatches) -> AnnotateArgs {
    let marker_tag = if args.get_flag("no-marker") {
        Some(None)
    } else {
        args.get_one::<String>("marker-tag").cloned().map(Some)
    };

    let report = match args.get_one::<String>("report").map(String::as_str) {
        Some("json") => ReportFormat::Json,
        _ => ReportFormat::Text,
    };

    AnnotateArgs {
        source: args
            .get_one::<PathBuf>("source")
            .cloned()
            .unwrap_or_default(),
        target: args.get_one::<PathBuf>("target").cloned(),
        config: args.get_one::<PathBuf>("config").cloned(),
        overrides: Overrides {
            candidate_tag: args.get_one::<String>("candidate-tag").cloned(),
            property_tag: args.get_one::<String>("property-tag").cloned(),
            marker_tag,
            attributes: args
                .get_many::<(String, String)>("attr")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            no_create: args.get_flag("no-create"),
        },
        output: SerializeOptions::default()
            .with_declaration(args.get_flag("declaration"))
            .with_indent(args.get_one::<usize>("indent").copied()),
        report,
        quiet: args.get_flag("quiet"),
    }
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("TOML")
        .value_parser(value_parser!(PathBuf))
        .help("Annotation configuration file")
}

/// The `tintmark` command
#[must_use]
pub fn command() -> Command {
    Command::new("tintmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Idempotent, marker-gated property annotation for XML documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output on stderr (repeatable)"),
        )
        .arg(
            Arg::new("silent")
                .short('q')
                .long("silent")
                .global(true)
                .action(ArgAction::Count)
                .help("Less log output on stderr (repeatable)"),
        )
        .subcommand(
            Command::new("annotate")
                .about("Annotate every qualifying candidate with the property element")
                .arg(
                    Arg::new("source")
                        .long("source")
                        .value_name("PATH")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Input document"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .value_name("PATH")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the annotated document here"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("candidate-tag")
                        .long("candidate-tag")
                        .value_name("TAG")
                        .help("Elements to annotate"),
                )
                .arg(
                    Arg::new("property-tag")
                        .long("property-tag")
                        .value_name("TAG")
                        .help("Property element to create or update"),
                )
                .arg(
                    Arg::new("marker-tag")
                        .long("marker-tag")
                        .value_name("TAG")
                        .conflicts_with("no-marker")
                        .help("Only annotate candidates containing this element"),
                )
                .arg(
                    Arg::new("no-marker")
                        .long("no-marker")
                        .action(ArgAction::SetTrue)
                        .help("Annotate every candidate"),
                )
                .arg(
                    Arg::new("attr")
                        .long("attr")
                        .value_name("KEY=VALUE")
                        .action(ArgAction::Append)
                        .value_parser(parse_attribute_assignment)
                        .help("Property attribute (repeatable; replaces the configured set)"),
                )
                .arg(
                    Arg::new("no-create")
                        .long("no-create")
                        .action(ArgAction::SetTrue)
                        .help("Only update existing property elements"),
                )
                .arg(
                    Arg::new("declaration")
                        .long("declaration")
                        .action(ArgAction::SetTrue)
                        .help("Emit an XML declaration"),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Re-indent output with N spaces"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .value_name("FORMAT")
                        .default_value("text")
                        .value_parser(["text", "json"])
                        .help("Run report format on stderr"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Do not print the document to stdout"),
                ),
        )
        .subcommand(
            Command::new("show-config")
                .about("Print the effective configuration as TOML")
                .arg(config_arg()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Invocation {
        let matches = command().try_get_matches_from(args).unwrap();
        Invocation::from_matches(&matches).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn annotate_defaults() {
        let invocation = parse(&["tintmark", "annotate", "--source", "in.xml"]);
        assert_eq!(invocation, Invocation::Annotate(AnnotateArgs::new("in.xml")));
    }

    #[test]
    fn annotate_all_flags() {
        let invocation = parse(&[
            "tintmark",
            "annotate",
            "--source",
            "in.xml",
            "--target",
            "out.xml",
            "--config",
            "c.toml",
            "--candidate-tag",
            "Light",
            "--property-tag",
            "Tint",
            "--no-marker",
            "--attr",
            "Hue=210",
            "--attr",
            "Sat=5",
            "--no-create",
            "--declaration",
            "--indent",
            "2",
            "--report",
            "json",
            "--quiet",
        ]);

        let Invocation::Annotate(args) = invocation else {
            panic!("expected annotate");
        };
        assert_eq!(args.target, Some(PathBuf::from("out.xml")));
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
        assert_eq!(
            args.overrides,
            Overrides {
                candidate_tag: Some("Light".into()),
                property_tag: Some("Tint".into()),
                marker_tag: Some(None),
                attributes: vec![("Hue".into(), "210".into()), ("Sat".into(), "5".into())],
                no_create: true,
            }
        );
        assert_eq!(args.output, SerializeOptions { declaration: true, indent: Some(2) });
        assert_eq!(args.report, ReportFormat::Json);
        assert!(args.quiet);
    }

    #[test]
    fn marker_flags_conflict() {
        let result = command().try_get_matches_from([
            "tintmark",
            "annotate",
            "--source",
            "in.xml",
            "--marker-tag",
            "Origin",
            "--no-marker",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_attr_is_rejected() {
        let result = command().try_get_matches_from([
            "tintmark", "annotate", "--source", "in.xml", "--attr", "novalue",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let overrides = Overrides {
            marker_tag: Some(Some("Anchor".into())),
            attributes: vec![("A".into(), "1".into())],
            ..Overrides::default()
        };
        let config = overrides.apply(AnnotationConfig::default());

        assert_eq!(config.candidate_tag, "Neutral");
        assert_eq!(config.marker_tag.as_deref(), Some("Anchor"));
        assert_eq!(config.attributes.len(), 1);
        assert_eq!(config.attributes.get("A").map(String::as_str), Some("1"));
        assert!(config.create_missing);
    }

    #[test]
    fn show_config_takes_optional_file() {
        assert_eq!(
            parse(&["tintmark", "show-config"]),
            Invocation::ShowConfig { config: None }
        );
    }
}
