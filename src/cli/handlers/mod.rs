use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::{Item, Project, is_done_status};
use crate::ops::sort::{SortField, SortKey};
use crate::ops::{predicate, sort};
use crate::parse::parse_filter;
use crate::remote::ProjectClient;
use crate::tui::Session;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    cmd: Commands,
    session: &Session,
    client: &dyn ProjectClient,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::List(args) => cmd_list(args, session, client, json),
        Commands::Show(args) => cmd_show(args, session, client, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_items(session: &Session, client: &dyn ProjectClient) -> Result<(Project, Vec<Item>), Box<dyn std::error::Error>> {
    tracing::debug!(project = %session.project_id, owner = %session.owner, "cli fetch");
    let (project, mut items) = client.fetch_project(&session.project_id, &session.owner, session.item_limit)?;
    if session.exclude_done {
        items.retain(|item| !is_done_status(&item.status));
    }
    Ok((project, items))
}

/// Filter and sort the fetched items the way the table view would
pub fn select_items<'a>(
    project: &Project,
    items: &'a [Item],
    session: &Session,
    args: &ListArgs,
) -> Result<Vec<&'a Item>, String> {
    let mut spec = parse_filter(args.filter.as_deref().unwrap_or(""));
    if spec.iterations.is_empty() {
        spec.iterations = session.iteration_filters.clone();
    }
    let mut selected = predicate::apply(items, &project.fields, &spec, Utc::now());

    if let Some(name) = args.sort.as_deref() {
        let field = SortField::parse(name).ok_or_else(|| {
            format!(
                "unknown sort field '{}' (expected: title, status, repository, labels, milestone, sub-issues, priority, assignees, number, created, updated)",
                name
            )
        })?;
        let key = SortKey {
            field: Some(field),
            ascending: !args.desc,
        };
        sort::apply(&mut selected, key);
    }
    Ok(selected)
}

/// Resolve an item by node id, `#number`, bare number, or `owner/repo#number`
pub fn find_item<'a>(items: &'a [Item], needle: &str) -> Option<&'a Item> {
    let needle = needle.trim();
    if let Some(item) = items.iter().find(|i| i.id == needle || i.reference() == needle) {
        return Some(item);
    }
    let number: u64 = needle.trim_start_matches('#').parse().ok()?;
    items.iter().find(|i| i.number == number)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(
    args: ListArgs,
    session: &Session,
    client: &dyn ProjectClient,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (project, items) = load_items(session, client)?;
    let selected = select_items(&project, &items, session, &args)?;

    if json {
        let out = list_to_json(&project, items.len(), &selected);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_list_header(&project, selected.len(), items.len()));
        for item in &selected {
            println!("{}", format_item_line(item));
        }
    }
    Ok(())
}

fn cmd_show(
    args: ShowArgs,
    session: &Session,
    client: &dyn ProjectClient,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, items) = load_items(session, client)?;
    let item = find_item(&items, &args.item).ok_or_else(|| format!("item not found: {}", args.item))?;

    let body = match item.locator() {
        Some((repo, number)) => match client.fetch_issue_body(repo, number) {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(item = %item.id, error = %e, "could not fetch body");
                None
            }
        },
        None => None,
    };

    if json {
        let mut out = item_to_json(item);
        out.body = body.or_else(|| (!item.description.is_empty()).then(|| item.description.clone()));
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_item_detail(item, body.as_deref()) {
            println!("{}", line);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::StubClient;

    fn session() -> Session {
        Session {
            project_id: "1".into(),
            item_limit: 100,
            ..Default::default()
        }
    }

    fn list_args(filter: Option<&str>, sort: Option<&str>, desc: bool) -> ListArgs {
        ListArgs {
            filter: filter.map(str::to_string),
            sort: sort.map(str::to_string),
            desc,
        }
    }

    #[test]
    fn list_filters_then_sorts() {
        let client = StubClient::new();
        let (project, items) = load_items(&session(), &client).unwrap();
        let selected = select_items(&project, &items, &session(), &list_args(Some("assignee:tanaka"), Some("title"), true))
            .unwrap();
        let titles: Vec<&str> = selected.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["TUI layout", "Authentication flow"]);
    }

    #[test]
    fn unknown_sort_field_is_an_error() {
        let client = StubClient::new();
        let (project, items) = load_items(&session(), &client).unwrap();
        let err = select_items(&project, &items, &session(), &list_args(None, Some("color"), false)).unwrap_err();
        assert!(err.starts_with("unknown sort field 'color'"));
    }

    #[test]
    fn exclude_done_drops_done_items() {
        let client = StubClient::new();
        let s = Session {
            exclude_done: true,
            ..session()
        };
        let (_, items) = load_items(&s, &client).unwrap();
        assert!(items.iter().all(|i| i.status != "Done"));
    }

    #[test]
    fn find_by_id_number_or_reference() {
        let items = StubClient::sample_items();
        assert_eq!(find_item(&items, "PVTI_121").map(|i| i.title.as_str()), Some("API integration"));
        let by_number = find_item(&items, "#120").unwrap();
        assert_eq!(by_number.id, "PVTI_120");
        let reference = by_number.reference();
        assert_eq!(find_item(&items, &reference).unwrap().id, "PVTI_120");
        assert!(find_item(&items, "nope").is_none());
    }
}
