use crate::infra::connect;
use crate::render::{export_sites, render_assessment, render_dashboard, render_sites};
use crate::server;
use clap::{Args, Parser, Subcommand};
use erw_sites::assessment::{
    AssessmentError, FilterQuery, FormSubmission, SortDirection, SortField,
};
use erw_sites::config::AppConfig;
use erw_sites::error::AppError;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ERW Site Console",
    about = "Browse, summarise and score enhanced rock weathering candidate sites",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP front end (default command)
    Serve(ServeArgs),
    /// List or export the candidate site catalogue
    Sites {
        #[command(subcommand)]
        command: SitesCommand,
    },
    /// Summarise a filtered site set: counts, mean score and tier distribution
    Dashboard(FilterArgs),
    /// Score a site through the remote scoring service
    Assess {
        #[command(subcommand)]
        command: AssessCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SitesCommand {
    /// Print one page of sites
    List(FilterArgs),
    /// Write one page of sites to a CSV file
    Export(ExportArgs),
}

#[derive(Subcommand, Debug)]
enum AssessCommand {
    /// Estimate parameters for a listed site from its region and score them
    Site(SiteArgs),
    /// Score explicitly entered site parameters
    Form(FormArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct FilterArgs {
    /// Region substring to filter on; blank means all regions
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Sort field: score, name or id
    #[arg(long, default_value = "score")]
    pub(crate) sort: SortField,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "desc")]
    pub(crate) dir: SortDirection,
    /// Page size (clamped to 1-100)
    #[arg(long, default_value_t = FilterQuery::MAX_PAGE_SIZE)]
    pub(crate) size: u32,
}

impl FilterArgs {
    fn query(&self) -> FilterQuery {
        FilterQuery {
            region: self.region.clone(),
            sort_field: self.sort,
            sort_direction: self.dir,
            page_size: self.size,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination CSV file
    #[arg(long)]
    pub(crate) output: PathBuf,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SiteArgs {
    /// Exact name of the site to assess
    #[arg(long)]
    pub(crate) name: String,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct FormArgs {
    /// CSV file of `field,value` rows
    #[arg(long, conflicts_with = "example")]
    pub(crate) input: Option<PathBuf>,
    /// Use the preloaded Des Moines example values
    #[arg(long)]
    pub(crate) example: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Sites {
            command: SitesCommand::List(args),
        } => list_sites(args).await,
        Command::Sites {
            command: SitesCommand::Export(args),
        } => export(args).await,
        Command::Dashboard(args) => dashboard(args).await,
        Command::Assess {
            command: AssessCommand::Site(args),
        } => assess_site(args).await,
        Command::Assess {
            command: AssessCommand::Form(args),
        } => assess_form(args).await,
    }
}

async fn list_sites(args: FilterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let session = connect(&config.service)?;
    let query = args.query();
    let sites = session.refresh(query.clone()).await?;
    render_sites(&query, &sites);
    Ok(())
}

async fn export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let session = connect(&config.service)?;
    let sites = session.refresh(args.filter.query()).await?;

    let file = File::create(&args.output)?;
    export_sites(&sites, BufWriter::new(file))?;
    println!("Exported {} sites to {}", sites.len(), args.output.display());
    Ok(())
}

async fn dashboard(args: FilterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let session = connect(&config.service)?;
    session.refresh(args.query()).await?;
    render_dashboard(&session.dashboard());
    Ok(())
}

async fn assess_site(args: SiteArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let session = connect(&config.service)?;
    session.refresh(args.filter.query()).await?;
    let record = session.inspect_site_named(args.name.trim()).await?;
    render_assessment(&record);
    Ok(())
}

async fn assess_form(args: FormArgs) -> Result<(), AppError> {
    let form = match (args.input, args.example) {
        (Some(path), _) => FormSubmission::from_csv_reader(File::open(path)?)?,
        (None, true) => FormSubmission::example(),
        (None, false) => {
            return Err(AssessmentError::Validation {
                field: "input".to_string(),
                reason: "pass --input <csv> or --example".to_string(),
            }
            .into())
        }
    };

    let config = AppConfig::load()?;
    let session = connect(&config.service)?;
    let record = session.submit_form(&form).await?;
    render_assessment(&record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_map_to_query() {
        let cli = Cli::try_parse_from([
            "erw-console",
            "sites",
            "list",
            "--region",
            "India",
            "--sort",
            "name",
            "--dir",
            "asc",
            "--size",
            "25",
        ])
        .expect("arguments parse");

        let Some(Command::Sites {
            command: SitesCommand::List(args),
        }) = cli.command
        else {
            panic!("expected sites list");
        };
        let query = args.query();
        assert_eq!(query.region(), Some("India"));
        assert_eq!(query.sort_field, SortField::Name);
        assert_eq!(query.sort_direction, SortDirection::Asc);
        assert_eq!(query.page_size, 25);
    }

    #[test]
    fn unsupported_sort_field_is_rejected() {
        let result = Cli::try_parse_from(["erw-console", "dashboard", "--sort", "latitude"]);
        assert!(result.is_err());
    }

    #[test]
    fn form_input_and_example_conflict() {
        let result = Cli::try_parse_from([
            "erw-console",
            "assess",
            "form",
            "--input",
            "site.csv",
            "--example",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["erw-console"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
