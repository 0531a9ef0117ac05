use repo_finder::{
    filter_by_owner_type, run_query_pipeline, run_selection_pipeline, Config, GithubApi,
    GithubClient, OrganizationsView, OwnerType, Repository, SearchView,
};

use std::sync::Arc;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::unbounded_channel,
};

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

/// A line typed in interactive mode.
#[derive(Debug, PartialEq)]
enum Command {
    Text(String),
    Select(usize),
    ClearSelection,
    Filter(Option<OwnerType>),
    Quit,
    Invalid(String),
}

impl Command {
    fn parse(line: &str) -> Command {
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Command::Text(line.to_owned());
        };
        let mut words = command.split_whitespace();
        match (words.next(), words.next()) {
            (Some("select"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Select(n),
                _ => Command::Invalid(format!("'{n}' is not a result number")),
            },
            (Some("clear"), None) => Command::ClearSelection,
            (Some("filter"), Some("all")) => Command::Filter(None),
            (Some("filter"), Some(tag)) => match tag.parse::<OwnerType>() {
                Ok(owner_type) => Command::Filter(Some(owner_type)),
                Err(err) => Command::Invalid(err),
            },
            (Some("quit"), None) => Command::Quit,
            _ => Command::Invalid(format!("unknown command ':{}'", command.trim())),
        }
    }
}

fn displayed(repositories: &[Repository], filter: Option<OwnerType>) -> Vec<Repository> {
    match filter {
        Some(owner_type) => filter_by_owner_type(owner_type)(repositories),
        None => repositories.to_vec(),
    }
}

fn print_repositories(repositories: &[Repository]) {
    if repositories.is_empty() {
        println!("No repositories.");
    }
    for (idx, repo) in repositories.iter().enumerate() {
        println!(
            "{:>3}. {} [{}] {}",
            idx + 1,
            repo.full_name,
            repo.owner.owner_type,
            repo.description.as_deref().unwrap_or("")
        );
    }
}

fn print_search_view(view: &SearchView, filter: Option<OwnerType>) {
    if let Some(message) = &view.error_message {
        println!("! {}", message);
    }
    print_repositories(&displayed(&view.repositories, filter));
}

fn print_organizations(view: &OrganizationsView) {
    if view.organizations.is_empty() {
        println!("  (no organizations)");
    }
    for org in &view.organizations {
        println!(
            "  - {} {}",
            org.login.as_deref().unwrap_or("<unnamed>"),
            org.description.as_deref().unwrap_or("")
        );
    }
}

/// `search <query...> [--owner-type <type>]`: one query through the pipeline.
async fn search(api: Arc<dyn GithubApi>, config: &Config, args: &[String]) {
    let mut filter = None;
    let mut words = Vec::new();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "--owner-type" {
            match args.next().map(|tag| tag.parse::<OwnerType>()) {
                Some(Ok(owner_type)) => filter = Some(owner_type),
                Some(Err(err)) => {
                    error!("{err}");
                    return;
                }
                None => {
                    error!("--owner-type needs a value");
                    return;
                }
            }
        } else {
            words.push(arg.as_str());
        }
    }
    let query = words.join(" ");

    let (query_tx, query_rx) = unbounded_channel();
    let (update_tx, mut update_rx) = unbounded_channel();
    tokio::spawn(run_query_pipeline(api, config.debounce, query_rx, update_tx));

    if query.trim().is_empty() {
        error!("Nothing to search for, usage: search <query...> [--owner-type <type>]");
        return;
    }
    let mut view = SearchView::new(query_tx);
    if let Err(err) = view.on_text_change(&query) {
        error!("{err}");
        return;
    }
    match update_rx.recv().await {
        Some(update) => {
            view.apply(update);
            print_search_view(&view, filter);
        }
        None => error!("Search pipeline stopped without an answer"),
    }
}

/// `interactive`: every stdin line is a keystroke event or a `:command`.
async fn interactive(api: Arc<dyn GithubApi>, config: &Config) {
    let (query_tx, query_rx) = unbounded_channel();
    let (search_tx, mut search_rx) = unbounded_channel();
    let (selection_tx, selection_rx) = unbounded_channel();
    let (orgs_tx, mut orgs_rx) = unbounded_channel();
    tokio::spawn(run_query_pipeline(
        api.clone(),
        config.debounce,
        query_rx,
        search_tx,
    ));
    tokio::spawn(run_selection_pipeline(api, selection_rx, orgs_tx));

    let mut search_view = SearchView::new(query_tx);
    let mut orgs_view = OrganizationsView::new(selection_tx);
    let mut filter: Option<OwnerType> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type to search, ':select <n>', ':clear', ':filter <user|org|bot|all>', ':quit'");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        error!("Couldn't read from stdin");
                        error!("{err}");
                        break;
                    }
                };
                let sent = match Command::parse(&line) {
                    Command::Text(text) => search_view.on_text_change(&text),
                    Command::Select(n) => {
                        match displayed(&search_view.repositories, filter).into_iter().nth(n - 1) {
                            Some(repo) => {
                                println!("Selected {}", repo.full_name);
                                orgs_view.on_repository_selected(Some(repo))
                            }
                            None => {
                                warn!("No result number {n}");
                                Ok(())
                            }
                        }
                    }
                    Command::ClearSelection => orgs_view.on_repository_selected(None),
                    Command::Filter(owner_type) => {
                        filter = owner_type;
                        print_search_view(&search_view, filter);
                        Ok(())
                    }
                    Command::Quit => break,
                    Command::Invalid(reason) => {
                        warn!("{reason}");
                        Ok(())
                    }
                };
                if let Err(err) = sent {
                    error!("{err}");
                    break;
                }
            }
            Some(update) = search_rx.recv() => {
                search_view.apply(update);
                print_search_view(&search_view, filter);
            }
            Some(update) = orgs_rx.recv() => {
                orgs_view.apply(update);
                print_organizations(&orgs_view);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return;
        }
    };
    let api: Arc<dyn GithubApi> = match GithubClient::new(reqwest::Client::new(), &config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!("{err}");
            return;
        }
    };

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("search") => search(api, &config, &args[2..]).await,
        Some("interactive") => interactive(api, &config).await,
        Some(other) => error!("Unrecognized argument {}, closing...", other),
        None => error!("Missing mode, expected 'search <query...>' or 'interactive'"),
    }
}
