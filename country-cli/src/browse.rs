use std::{collections::HashMap, fmt};

use country_core::{DetailPanel, Directory, SortKey, WeatherService};
use inquire::{InquireError, Select, Text};

use crate::render;

/// Rows printed after each change before the view is cut short.
const PREVIEW_ROWS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Sort,
    Continent,
    Language,
    Clear,
    Toggle,
    ShowAll,
    Quit,
}

impl Action {
    const ALL: [Action; 8] = [
        Action::Toggle,
        Action::Search,
        Action::Sort,
        Action::Continent,
        Action::Language,
        Action::Clear,
        Action::ShowAll,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search by name",
            Action::Sort => "Sort",
            Action::Continent => "Filter by continent",
            Action::Language => "Filter by language",
            Action::Clear => "Clear",
            Action::Toggle => "Show more / show less",
            Action::ShowAll => "Print full list",
            Action::Quit => "Quit",
        })
    }
}

const ANY: &str = "(any)";

/// Turn a picked option back into a filter value; `ANY` means no filter.
fn choice_to_filter(choice: String) -> Option<String> {
    if choice == ANY { None } else { Some(choice) }
}

/// Options for a filter picker: "(any)" first, then the names sorted.
fn picker_options(names: &[String]) -> Vec<String> {
    let mut sorted = names.to_vec();
    sorted.sort_by_key(|n| n.to_lowercase());
    std::iter::once(ANY.to_string()).chain(sorted).collect()
}

fn preview(directory: &Directory, panels: &HashMap<String, DetailPanel>) -> String {
    let mut lines: Vec<String> = directory
        .visible()
        .take(PREVIEW_ROWS)
        .map(|c| {
            let marker = if panels.get(&c.code).is_some_and(DetailPanel::is_expanded) {
                "-"
            } else {
                "+"
            };
            format!("{marker} {} ({}) - {}", c.name, c.code, c.continent_name())
        })
        .collect();

    if directory.visible_len() > PREVIEW_ROWS {
        lines.push(format!("  ... {} more", directory.visible_len() - PREVIEW_ROWS));
    }
    lines.push(format!(
        "{} of {} countries ({})",
        directory.visible_len(),
        directory.source().len(),
        render::filters_line(directory.filters()),
    ));
    lines.join("\n")
}

/// Escape/Ctrl-C inside a sub-prompt just returns to the menu.
fn cancelled<T>(res: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn run(mut directory: Directory, weather: &WeatherService) -> anyhow::Result<()> {
    let mut panels: HashMap<String, DetailPanel> = HashMap::new();

    loop {
        println!("\n{}\n", preview(&directory, &panels));

        let Some(action) = cancelled(Select::new("Action:", Action::ALL.to_vec()).prompt())?
        else {
            return Ok(());
        };

        match action {
            Action::Quit => return Ok(()),
            Action::Search => {
                let current = directory.filters().search.clone();
                if let Some(text) =
                    cancelled(Text::new("Search:").with_initial_value(&current).prompt())?
                {
                    directory.set_search(text);
                }
            }
            Action::Sort => {
                let mut options = vec!["Source order".to_string()];
                options.extend(SortKey::all().iter().map(|k| k.label().to_string()));
                if let Some(choice) = cancelled(Select::new("Sort by:", options).prompt())? {
                    directory.set_sort(SortKey::try_from(choice.as_str()).ok());
                }
            }
            Action::Continent => {
                let options = picker_options(directory.continents());
                if let Some(choice) = cancelled(Select::new("Continent:", options).prompt())? {
                    directory.set_continent(choice_to_filter(choice));
                }
            }
            Action::Language => {
                let options = picker_options(directory.languages());
                if let Some(choice) = cancelled(Select::new("Language:", options).prompt())? {
                    directory.set_language(choice_to_filter(choice));
                }
            }
            Action::Clear => directory.clear(),
            Action::ShowAll => println!("\n{}", render::list(&directory)),
            Action::Toggle => {
                let options: Vec<String> =
                    directory.visible().map(|c| format!("{} ({})", c.name, c.code)).collect();
                if options.is_empty() {
                    println!("No countries match the current filters.");
                    continue;
                }

                let Some(choice) = cancelled(Select::new("Country:", options).prompt())? else {
                    continue;
                };
                let code = choice
                    .rsplit_once('(')
                    .map(|(_, rest)| rest.trim_end_matches(')'))
                    .unwrap_or(choice.as_str());
                let country = directory.find(code)?;

                let panel = panels.entry(country.code.clone()).or_default();
                if panel.toggle(country, weather).await {
                    println!("\n{}", render::details(country, panel.weather()));
                } else {
                    println!("\n{}", render::summary(country));
                }
            }
        }
    }
}
