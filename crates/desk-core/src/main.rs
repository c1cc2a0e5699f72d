use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use desk_core::{init_tracing, DeskConfig, Role, Workspace};
use desk_filter::FilterCriteria;
use desk_model::{parse_day, ArticleId, ArticleStatus, CompanyId, TagId};
use std::path::PathBuf;

fn company_arg() -> Arg {
    Arg::new("company")
        .long("company")
        .short('c')
        .help("Company id; defaults to default_company from the config")
}

fn select_arg() -> Arg {
    Arg::new("select")
        .long("select")
        .short('s')
        .action(ArgAction::Append)
        .required(true)
        .help("Selected article id (repeatable)")
}

fn cli() -> Command {
    Command::new("desk")
        .version(desk_core::VERSION)
        .about("Company-scoped article filtering and bulk tag reconciliation")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file"),
        )
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Mock dataset JSON; overrides dataset_path"),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .global(true)
                .value_parser(value_parser!(Role))
                .help("Mock role flag; overrides role"),
        )
        .subcommand(Command::new("companies").about("List companies"))
        .subcommand(
            Command::new("filter")
                .about("List articles matching all criteria")
                .arg(company_arg())
                .arg(Arg::new("search").long("search").help("Case-insensitive substring"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Draft, Production or Closed"),
                )
                .arg(Arg::new("from").long("from").help("First day, YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").help("Last day, YYYY-MM-DD"))
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .action(ArgAction::Append)
                        .help("Required tag id (repeatable)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("presence")
                .about("Show tag presence across selected articles")
                .arg(company_arg())
                .arg(select_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Add or remove one tag across selected articles")
                .arg(company_arg())
                .arg(select_arg())
                .arg(Arg::new("tag").long("tag").required(true).help("Tag id"))
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Confirm the action; without it only the plan is shown"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<DeskConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DeskConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => DeskConfig::default(),
    };
    if let Some(path) = matches.get_one::<PathBuf>("dataset") {
        config = config.with_dataset(path.clone());
    }
    if let Some(role) = matches.get_one::<Role>("role") {
        config = config.with_role(*role);
    }
    Ok(config)
}

fn company_of(args: &ArgMatches, config: &DeskConfig) -> anyhow::Result<CompanyId> {
    match args.get_one::<String>("company") {
        Some(company) => Ok(CompanyId::from(company.as_str())),
        None => config
            .default_company
            .clone()
            .context("no --company given and no default_company configured"),
    }
}

fn selection_of(args: &ArgMatches) -> Vec<ArticleId> {
    args.get_many::<String>("select")
        .into_iter()
        .flatten()
        .map(|id| ArticleId::from(id.as_str()))
        .collect()
}

fn criteria_of(args: &ArgMatches) -> anyhow::Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();
    if let Some(search) = args.get_one::<String>("search") {
        criteria = criteria.with_search(search.as_str());
    }
    if let Some(status) = args.get_one::<String>("status") {
        criteria = criteria.with_status(status.parse::<ArticleStatus>()?);
    }
    let from = args.get_one::<String>("from").map(|d| parse_day(d.as_str())).transpose()?;
    let to = args.get_one::<String>("to").map(|d| parse_day(d.as_str())).transpose()?;
    criteria = criteria.with_date_range(from, to);
    for tag in args.get_many::<String>("tag").into_iter().flatten() {
        criteria = criteria.with_tag(tag.as_str());
    }
    Ok(criteria)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config.log);

    let workspace = Workspace::from_config(&config)?;

    match matches.subcommand() {
        Some(("companies", _)) => {
            for company in workspace.companies() {
                println!("{}\t{}", company.id, company.name);
            }
        }
        Some(("filter", args)) => {
            let desk = workspace.company(&company_of(args, &config)?)?;
            let criteria = criteria_of(args)?;
            let visible = desk.filter(&criteria)?;

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                let summary = desk.summarize(&criteria)?;
                for article in &visible {
                    println!(
                        "{}\t{}\t{}\t{}",
                        article.id,
                        article.status.map_or("-", |s| s.as_str()),
                        article.title.as_deref().unwrap_or(""),
                        article.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
                    );
                }
                println!("{} of {} articles", summary.matched, summary.total);
            }
        }
        Some(("presence", args)) => {
            let desk = workspace.company(&company_of(args, &config)?)?;
            let session = desk.open_reconcile(&selection_of(args))?;

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(session.presence())?);
            } else {
                for tag in session.universe() {
                    if let Some(p) = session.presence().get(&tag.id) {
                        println!(
                            "{}\t{}\t{}/{}\t{}",
                            tag.id,
                            tag.name,
                            p.present_count,
                            p.selection_size(),
                            p.action
                        );
                    }
                }
            }
        }
        Some(("apply", args)) => {
            let desk = workspace.company(&company_of(args, &config)?)?;
            let mut session = desk.open_reconcile(&selection_of(args))?;
            let tag = TagId::from(args.get_one::<String>("tag").map_or("", String::as_str));

            let Some(pending) = session.select(&tag)?.cloned() else {
                bail!("tag {tag} is not a tag of company {}", desk.company());
            };
            println!(
                "{} tag {} on {} selected article(s): present on {}, missing on {}",
                pending.action,
                pending.tag_id,
                pending.presence.selection_size(),
                pending.presence.present_count,
                pending.presence.missing_count
            );

            if !args.get_flag("yes") {
                session.cancel()?;
                println!("not applied; pass --yes to confirm");
                return Ok(());
            }

            match session.confirm().await {
                Ok(outcome) => println!("updated {} article(s)", outcome.updated_count),
                Err(err) => {
                    if let Some(outcome) = session.last_outcome() {
                        eprintln!("updated {} article(s) before the failure", outcome.updated_count);
                    }
                    return Err(err.into());
                }
            }
        }
        _ => {}
    }

    Ok(())
}
